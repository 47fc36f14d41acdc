use std::sync::Arc;

use crate::{Error, RecipeService, RecommendRequest, RecommendResponse, Result};
use dish_domain::{FilterRecord, RankedResult, SessionContext, keywords};

#[derive(Debug, Clone)]
pub enum TurnOutcome {
	/// The utterance was too vague to search. Asking the same utterance again searches anyway.
	Clarify { question: &'static str },
	Results {
		response: RecommendResponse,
		/// Query of the turn this utterance refined.
		refined_from: Option<String>,
	},
}

/// One user's conversation: a private session history over a shared pipeline.
pub struct Conversation {
	service: Arc<RecipeService>,
	session: SessionContext,
	pending_clarification: Option<String>,
}
impl Conversation {
	pub fn new(service: Arc<RecipeService>) -> Self {
		let capacity = usize::try_from(service.cfg.session.memory_size).unwrap_or(usize::MAX);

		Self { service, session: SessionContext::new(capacity), pending_clarification: None }
	}

	pub fn session(&self) -> &SessionContext {
		&self.session
	}

	pub fn reset(&mut self) {
		self.session.clear();
		self.pending_clarification = None;
	}

	pub async fn ask(&mut self, utterance: &str) -> Result<TurnOutcome> {
		let utterance = utterance.trim();

		if utterance.is_empty() {
			return Err(Error::InvalidRequest { message: "Query must be non-empty.".to_string() });
		}

		let repeated = self.pending_clarification.take().is_some_and(|pending| pending == utterance);
		let refinement = self.session.classify_refinement(utterance);

		if refinement.is_none()
			&& !repeated
			&& let Some(question) = keywords::clarifying_question(utterance)
		{
			tracing::info!(utterance, "Asking for clarification.");

			self.pending_clarification = Some(utterance.to_string());

			return Ok(TurnOutcome::Clarify { question });
		}

		let mut req = RecommendRequest::new(utterance);
		let refined_from = match refinement {
			Some(refinement) => {
				req = req.refining(refinement.filters);

				Some(refinement.query)
			},
			None => None,
		};
		let response = self.service.recommend(req).await?;

		if !response.results.is_empty() {
			self.session.record_turn(utterance, response.filters.clone(), response.results.clone());
		}

		Ok(TurnOutcome::Results { response, refined_from })
	}

	/// Recipes similar to result `index` (1-based) of the last recorded turn.
	pub async fn similar(
		&mut self,
		index: usize,
		limit: Option<u32>,
	) -> Result<Vec<RankedResult>> {
		let Some(last) = self.session.last_turn() else {
			return Err(Error::InvalidRequest {
				message: "There are no previous results to reference.".to_string(),
			});
		};
		let Some(reference) = index.checked_sub(1).and_then(|offset| last.results.get(offset))
		else {
			return Err(Error::InvalidRequest {
				message: format!(
					"Result index must be between 1 and {}, got {index}.",
					last.results.len()
				),
			});
		};
		let recipe_id = reference.candidate.recipe_id.clone();
		let title = reference.candidate.title.clone();
		let results = self.service.similar_recipes(&recipe_id, limit).await?;

		if !results.is_empty() {
			self.session.record_turn(
				format!("Similar to: {title}"),
				FilterRecord::default(),
				results.clone(),
			);
		}

		Ok(results)
	}
}
