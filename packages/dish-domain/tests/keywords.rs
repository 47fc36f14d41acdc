use dish_domain::keywords::{
	ASK_DISH_TYPE, ASK_MORE_SPECIFIC, ASK_TIME_BUDGET, clarifying_question, is_refinement,
	should_prioritize_ratings,
};

#[test]
fn quality_keywords_prioritize_ratings() {
	assert!(should_prioritize_ratings("best chicken recipes"));
	assert!(should_prioritize_ratings("What are your TOP RATED vegetarian curries from india"));
	assert!(should_prioritize_ratings("recommend me a vegan italian dinner for six people"));
}

#[test]
fn vague_queries_without_specifics_prioritize_ratings() {
	assert!(should_prioritize_ratings("something nice to cook for my family this weekend"));
	assert!(should_prioritize_ratings("any ideas for a great weekend treat"));
	assert!(!should_prioritize_ratings("any good dinner party ideas"));
}

#[test]
fn specific_queries_rely_on_similarity() {
	assert!(!should_prioritize_ratings("vegetarian dinner"));
	assert!(!should_prioritize_ratings("something good with salmon"));
	assert!(!should_prioritize_ratings("creamy mushroom risotto with parmesan and thyme"));
}

#[test]
fn short_generic_queries_prioritize_ratings() {
	assert!(should_prioritize_ratings("what should I cook"));
	assert!(!should_prioritize_ratings("what should I cook for guests tonight"));
}

#[test]
fn refinement_examples() {
	assert!(is_refinement("under 20 minutes"));
	assert!(is_refinement("but without onions"));
	assert!(is_refinement("also vegan"));
	assert!(!is_refinement("peanut butter cookies"));
	assert!(!is_refinement("show me vegan curry with less cheese and no nuts please"));
}

#[test]
fn clarifying_questions() {
	assert_eq!(clarifying_question("something tasty"), Some(ASK_DISH_TYPE));
	assert_eq!(clarifying_question("quick ideas please"), Some(ASK_TIME_BUDGET));
	assert_eq!(clarifying_question("quick"), Some(ASK_TIME_BUDGET));
	assert_eq!(clarifying_question("surprise me"), Some(ASK_MORE_SPECIFIC));
	assert_eq!(clarifying_question("pasta recipes"), None);
	assert_eq!(clarifying_question("something vegan"), None);
	assert_eq!(clarifying_question("quick meal in 20 minutes"), None);
	assert_eq!(clarifying_question("creamy tomato soup for tonight"), None);
}
