//! Ordered keyword rule tables used to classify provider failures

use regex::{Regex, RegexBuilder};

/// What a matching rule says about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOutcome {
	/// Amount is below what the provider will quote
	MinAmount,
	/// Provider found no route or quote; may be a disguised "too small"
	NoRoute,
	/// Condition a larger amount cannot fix (e.g. transfer-tax tokens)
	Unfixable,
}

#[derive(Debug, Clone)]
pub struct ClassificationRule {
	pattern: Regex,
	outcome: RuleOutcome,
}

impl ClassificationRule {
	/// Compile a case-insensitive rule
	pub fn new(pattern: &str, outcome: RuleOutcome) -> Result<Self, regex::Error> {
		let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
		Ok(Self { pattern, outcome })
	}

	pub fn outcome(&self) -> RuleOutcome {
		self.outcome
	}

	pub fn pattern(&self) -> &str {
		self.pattern.as_str()
	}

	pub fn is_match(&self, text: &str) -> bool {
		self.pattern.is_match(text)
	}
}

/// Ordered rule table; earlier rules win
#[derive(Debug, Clone, Default)]
pub struct ClassificationRules {
	rules: Vec<ClassificationRule>,
}

const DEFAULT_RULES: &[(&str, RuleOutcome)] = &[
	(r"amount\s+(is\s+)?too\s+(low|small)", RuleOutcome::MinAmount),
	(r"below\s+(the\s+)?min(imum)?", RuleOutcome::MinAmount),
	(r"min(imum)?\s+(deposit|amount|input)", RuleOutcome::MinAmount),
	(r"insufficient\s+(return|output)", RuleOutcome::MinAmount),
	(r"return\s+amount\s+is\s+not\s+enough", RuleOutcome::MinAmount),
	(r"no\s+(available\s+)?routes?", RuleOutcome::NoRoute),
	(r"no\s+(available\s+)?quotes?", RuleOutcome::NoRoute),
	(r"(unable|failed)\s+to\s+find\s+(a\s+)?(route|quote)", RuleOutcome::NoRoute),
	(r"fee[\s_-]*on[\s_-]*transfer", RuleOutcome::Unfixable),
	(r"transfer[\s_-]*tax", RuleOutcome::Unfixable),
	(r"tax(ed)?\s+token", RuleOutcome::Unfixable),
];

lazy_static::lazy_static! {
	static ref DEFAULTS: ClassificationRules =
		ClassificationRules::from_patterns(DEFAULT_RULES).expect("default rule patterns compile");
}

impl ClassificationRules {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared keyword table applied after any provider-specific rules
	pub fn defaults() -> &'static ClassificationRules {
		&DEFAULTS
	}

	pub fn from_patterns(patterns: &[(&str, RuleOutcome)]) -> Result<Self, regex::Error> {
		let rules = patterns
			.iter()
			.map(|(pattern, outcome)| ClassificationRule::new(pattern, *outcome))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { rules })
	}

	pub fn push(&mut self, rule: ClassificationRule) {
		self.rules.push(rule);
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &ClassificationRule> {
		self.rules.iter()
	}

	/// First `MinAmount`/`NoRoute` rule matching the text, in table order
	pub fn first_amount_or_route_match(&self, text: &str) -> Option<RuleOutcome> {
		self.rules
			.iter()
			.filter(|rule| rule.outcome != RuleOutcome::Unfixable)
			.find(|rule| rule.is_match(text))
			.map(|rule| rule.outcome)
	}

	pub fn any_unfixable(&self, text: &str) -> bool {
		self.rules
			.iter()
			.any(|rule| rule.outcome == RuleOutcome::Unfixable && rule.is_match(text))
	}
}
