//! Keyword heuristics over user utterances.
//!
//! All checks run on [`QueryTokens`]: the lower-cased text split into alphanumeric tokens. A
//! single-word keyword matches an equal token and a multi-word keyword matches an equal run of
//! consecutive tokens, so "but" never matches inside "butter".

pub const REFINEMENT_KEYWORDS: [&str; 15] = [
	"under",
	"less than",
	"more than",
	"faster",
	"quicker",
	"easier",
	"harder",
	"with",
	"without",
	"also",
	"but",
	"i want",
	"give me",
	"show me",
	"find me",
];

pub const ADDITIVE_KEYWORDS: [&str; 13] = [
	"chicken",
	"beef",
	"pork",
	"fish",
	"lamb",
	"turkey",
	"seafood",
	"vegetarian",
	"vegan",
	"gluten",
	"pasta",
	"rice",
	"pizza",
];

pub const QUALITY_KEYWORDS: [&str; 10] = [
	"best",
	"top",
	"highest rated",
	"highly rated",
	"top rated",
	"most popular",
	"popular",
	"favorite",
	"favourite",
	"recommend",
];

pub const VAGUE_TERMS: [&str; 6] = ["good", "nice", "great", "some", "any", "something"];

pub const SPECIFIC_TERMS: &[&str] = &[
	// Proteins.
	"chicken",
	"beef",
	"pork",
	"fish",
	"lamb",
	"turkey",
	"duck",
	"seafood",
	"salmon",
	"tuna",
	"shrimp",
	"prawn",
	"prawns",
	"tofu",
	"egg",
	"eggs",
	"protein",
	// Dietary labels.
	"vegetarian",
	"vegan",
	"gluten",
	"dairy",
	"lactose",
	"nut",
	"sugar",
	"keto",
	"paleo",
	"low fat",
	"low carb",
	"low calorie",
	"healthy",
	// Cuisines.
	"indian",
	"italian",
	"chinese",
	"mexican",
	"thai",
	"french",
	"japanese",
	"greek",
	"american",
	"spanish",
	"korean",
	"vietnamese",
	"mediterranean",
	// Meal types.
	"breakfast",
	"brunch",
	"lunch",
	"dinner",
	"dessert",
	"desserts",
	"snack",
	"snacks",
	"soup",
	"soups",
	"salad",
	"salads",
	"drink",
	"drinks",
	"side",
	"sides",
	"starter",
	"appetizer",
	"main",
	"mains",
	// Dishes.
	"pasta",
	"rice",
	"pizza",
	"curry",
	"risotto",
	"stew",
	"noodles",
	"lasagna",
	"burger",
	"sandwich",
	"tacos",
	"bread",
	"cake",
	"cookies",
	"pie",
	"smoothie",
	"sauce",
	// Cooking methods.
	"baked",
	"roasted",
	"grilled",
	"fried",
	"steamed",
	"braised",
	"slow cooked",
	// Time and difficulty.
	"quick",
	"fast",
	"easy",
	"simple",
	"hard",
	"advanced",
	"minute",
	"minutes",
	"hour",
	"hours",
];

/// Vague words that make a query a candidate for a clarifying question.
pub const CLARIFY_VAGUE_TERMS: [&str; 7] =
	["something", "anything", "good", "nice", "tasty", "yummy", "delicious"];

/// Constraints that make a query specific enough to search without asking back.
pub const CLARIFY_CONSTRAINT_TERMS: [&str; 16] = [
	"vegetarian",
	"vegan",
	"minutes",
	"easy",
	"breakfast",
	"lunch",
	"dinner",
	"chicken",
	"beef",
	"pork",
	"fish",
	"lamb",
	"protein",
	"low fat",
	"low carb",
	"gluten",
];

pub const TIME_UNIT_TERMS: [&str; 5] = ["min", "minute", "minutes", "hour", "hours"];

pub const REFINEMENT_MAX_WORDS: usize = 8;
pub const ADDITIVE_REFINEMENT_MAX_WORDS: usize = 6;
pub const SHORT_QUERY_MAX_WORDS: usize = 4;
pub const CLARIFY_SHORT_MAX_WORDS: usize = 2;

pub const ASK_DISH_TYPE: &str =
	"What type of dish are you looking for? For example: 'easy vegetarian pasta' or 'quick chicken recipes'";
pub const ASK_TIME_BUDGET: &str = "How much time do you have? (under 15 min, 15-30 min, 30-60 min)";
pub const ASK_MORE_SPECIFIC: &str =
	"Could you be more specific? For example: 'easy vegetarian pasta' or 'quick chicken recipes'";

#[derive(Debug, Clone)]
pub struct QueryTokens {
	word_count: usize,
	tokens: Vec<String>,
}
impl QueryTokens {
	pub fn new(text: &str) -> Self {
		let lowered = text.to_lowercase();
		let word_count = lowered.split_whitespace().count();
		let tokens = lowered
			.split(|ch: char| !ch.is_alphanumeric())
			.filter(|token| !token.is_empty())
			.map(str::to_string)
			.collect();

		Self { word_count, tokens }
	}

	/// Number of whitespace-separated words in the input text.
	pub fn word_count(&self) -> usize {
		self.word_count
	}

	pub fn contains(&self, keyword: &str) -> bool {
		let parts: Vec<&str> = keyword.split_whitespace().collect();

		if parts.is_empty() || parts.len() > self.tokens.len() {
			return false;
		}

		self.tokens
			.windows(parts.len())
			.any(|window| window.iter().zip(&parts).all(|(token, part)| token == part))
	}

	pub fn contains_any(&self, keywords: &[&str]) -> bool {
		keywords.iter().any(|keyword| self.contains(keyword))
	}
}

/// Whether a short follow-up reads like a tweak of the previous query.
///
/// Callers must treat the answer as `false` when there is no previous turn.
pub fn is_refinement(utterance: &str) -> bool {
	let tokens = QueryTokens::new(utterance);
	let words = tokens.word_count();

	(words <= REFINEMENT_MAX_WORDS && tokens.contains_any(&REFINEMENT_KEYWORDS))
		|| (words <= ADDITIVE_REFINEMENT_MAX_WORDS && tokens.contains_any(&ADDITIVE_KEYWORDS))
}

/// Whether ranking should favor well-reviewed recipes over semantic closeness.
pub fn should_prioritize_ratings(query: &str) -> bool {
	let tokens = QueryTokens::new(query);

	if tokens.contains_any(&QUALITY_KEYWORDS) {
		return true;
	}

	let has_specific = tokens.contains_any(SPECIFIC_TERMS);

	if has_specific {
		return false;
	}

	tokens.contains_any(&VAGUE_TERMS) || tokens.word_count() <= SHORT_QUERY_MAX_WORDS
}

/// Returns a follow-up question when the query is too vague to search usefully.
pub fn clarifying_question(query: &str) -> Option<&'static str> {
	let tokens = QueryTokens::new(query);
	let has_constraint = tokens.contains_any(&CLARIFY_CONSTRAINT_TERMS);

	if has_constraint {
		return None;
	}
	if tokens.contains_any(&CLARIFY_VAGUE_TERMS) {
		return Some(ASK_DISH_TYPE);
	}
	if tokens.contains("quick") && !tokens.contains_any(&TIME_UNIT_TERMS) {
		return Some(ASK_TIME_BUDGET);
	}
	if tokens.word_count() <= CLARIFY_SHORT_MAX_WORDS && !tokens.contains_any(&["recipe", "recipes"])
	{
		return Some(ASK_MORE_SPECIFIC);
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn matches_multi_word_keywords_as_token_runs() {
		let tokens = QueryTokens::new("Show me something LESS than 20 minutes");

		assert!(tokens.contains("less than"));
		assert!(tokens.contains("show me"));
		assert!(!tokens.contains("more than"));
		assert_eq!(tokens.word_count(), 7);
	}

	#[test]
	fn does_not_match_inside_longer_words() {
		let tokens = QueryTokens::new("peanut butter cookies");

		assert!(!tokens.contains("but"));
		assert!(!tokens.contains("nut"));
	}

	#[test]
	fn punctuation_separates_tokens() {
		let tokens = QueryTokens::new("gluten-free, please!");

		assert!(tokens.contains("gluten"));
		assert!(tokens.contains("please"));
		assert_eq!(tokens.word_count(), 2);
	}

	#[test]
	fn empty_keyword_never_matches() {
		assert!(!QueryTokens::new("anything").contains("  "));
	}
}
