use std::collections::VecDeque;

use time::OffsetDateTime;

use crate::{filter::FilterRecord, keywords, recipe::RankedResult};

pub const DEFAULT_SESSION_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct QueryTurn {
	pub query: String,
	pub filters: FilterRecord,
	pub results: Vec<RankedResult>,
	pub created_at: OffsetDateTime,
}

/// The state carried into a follow-up utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
	pub query: String,
	pub filters: FilterRecord,
}

/// Bounded FIFO history of one conversation.
///
/// Holds at most `capacity` turns, oldest first. Recording a turn at capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct SessionContext {
	turns: VecDeque<QueryTurn>,
	capacity: usize,
}
impl SessionContext {
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);

		Self { turns: VecDeque::with_capacity(capacity), capacity }
	}

	pub fn record_turn(
		&mut self,
		query: impl Into<String>,
		filters: FilterRecord,
		results: Vec<RankedResult>,
	) {
		if self.turns.len() == self.capacity {
			self.turns.pop_front();
		}

		self.turns.push_back(QueryTurn {
			query: query.into(),
			filters,
			results,
			created_at: OffsetDateTime::now_utc(),
		});

		tracing::debug!(turns = self.turns.len(), capacity = self.capacity, "Recorded query turn.");
	}

	pub fn last_turn(&self) -> Option<&QueryTurn> {
		self.turns.back()
	}

	/// Returns the previous query and its filters when `utterance` continues it.
	pub fn classify_refinement(&self, utterance: &str) -> Option<Refinement> {
		let last = self.last_turn()?;

		if !keywords::is_refinement(utterance) {
			return None;
		}

		tracing::info!(previous = last.query.as_str(), utterance, "Detected refinement query.");

		Some(Refinement { query: last.query.clone(), filters: last.filters.clone() })
	}

	/// 1-based lookup where 1 is the oldest retained turn.
	pub fn turn(&self, index: usize) -> Option<&QueryTurn> {
		index.checked_sub(1).and_then(|offset| self.turns.get(offset))
	}

	pub fn turns(&self) -> impl Iterator<Item = &QueryTurn> {
		self.turns.iter()
	}

	pub fn len(&self) -> usize {
		self.turns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.turns.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn clear(&mut self) {
		self.turns.clear();
	}

	pub fn history_summary(&self) -> String {
		if self.turns.is_empty() {
			return "No previous queries in this session.".to_string();
		}

		let rule = "-".repeat(60);
		let mut out = format!("Query History:\n{rule}\n");

		for (index, turn) in self.turns.iter().enumerate() {
			out.push_str(&format!("{}. {}\n", index + 1, turn.query));
		}

		out.push_str(&rule);
		out.push('\n');

		out
	}
}
impl Default for SessionContext {
	fn default() -> Self {
		Self::new(DEFAULT_SESSION_CAPACITY)
	}
}
