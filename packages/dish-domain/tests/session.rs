use dish_domain::{FilterRecord, SessionContext, keywords};

fn vegetarian() -> FilterRecord {
	FilterRecord::from_value(&serde_json::json!({ "dietary_tags": ["vegetarian"] }))
}

#[test]
fn evicts_oldest_turn_past_capacity() {
	let mut session = SessionContext::new(3);

	for index in 0..4 {
		session.record_turn(format!("query {index}"), FilterRecord::default(), Vec::new());
	}

	let queries: Vec<&str> = session.turns().map(|turn| turn.query.as_str()).collect();

	assert_eq!(session.len(), 3);
	assert_eq!(queries, vec!["query 1", "query 2", "query 3"]);
	assert_eq!(session.last_turn().map(|turn| turn.query.as_str()), Some("query 3"));
}

#[test]
fn default_capacity_is_ten() {
	let mut session = SessionContext::default();

	for index in 0..11 {
		session.record_turn(format!("q{index}"), FilterRecord::default(), Vec::new());
	}

	assert_eq!(session.capacity(), 10);
	assert_eq!(session.len(), 10);
	assert_eq!(session.turn(1).map(|turn| turn.query.as_str()), Some("q1"));
}

#[test]
fn empty_session_never_refines() {
	let session = SessionContext::default();

	assert!(session.last_turn().is_none());
	assert_eq!(session.classify_refinement("under 20 minutes"), None);
}

#[test]
fn short_constraint_refines_previous_turn() {
	let mut session = SessionContext::default();

	session.record_turn("vegetarian dinner", vegetarian(), Vec::new());

	let refinement =
		session.classify_refinement("under 20 minutes").expect("Expected a refinement.");

	assert_eq!(refinement.query, "vegetarian dinner");
	assert_eq!(refinement.filters, vegetarian());
}

#[test]
fn long_utterance_is_a_new_query() {
	let mut session = SessionContext::default();

	session.record_turn("vegetarian dinner", vegetarian(), Vec::new());

	assert_eq!(
		session.classify_refinement("show me vegan curry with less cheese and no nuts please"),
		None
	);
}

#[test]
fn refinement_word_count_cutoffs_are_exact() {
	// Refinement keyword: up to eight words.
	assert!(keywords::is_refinement("one two three four five six seven with"));
	assert!(!keywords::is_refinement("one two three four five six seven eight with"));
	// Additive keyword: up to six words.
	assert!(keywords::is_refinement("one two three four five chicken"));
	assert!(!keywords::is_refinement("one two three four five six chicken"));
	// Seven words with both kinds still refine through the refinement keyword.
	assert!(keywords::is_refinement("one two three four five chicken also"));
}

#[test]
fn lookups_and_summary() {
	let mut session = SessionContext::new(5);

	assert_eq!(session.history_summary(), "No previous queries in this session.");

	session.record_turn("pasta", FilterRecord::default(), Vec::new());
	session.record_turn("make it vegan", FilterRecord::default(), Vec::new());

	assert!(session.turn(0).is_none());
	assert!(session.turn(3).is_none());
	assert_eq!(session.turn(2).map(|turn| turn.query.as_str()), Some("make it vegan"));

	let summary = session.history_summary();

	assert!(summary.contains("1. pasta\n"));
	assert!(summary.contains("2. make it vegan\n"));

	session.clear();

	assert!(session.is_empty());
}
