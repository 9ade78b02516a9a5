//! Candidate question pools
//!
//! Two ordered rule groups share one rule shape. The property-specific group
//! reads broad signals across the whole conversation and is ranked
//! deterministically; the conversation group reads the recent tag window and
//! the literal latest reply and feeds the random selector. Every rule whose
//! predicate holds contributes one candidate, so categories overlap freely
//! and the same question may appear more than once.

use crate::conversation::ConversationTurn;
use crate::topics::{self, ProfileSignals, TagSet};
use crate::vocabulary::Signal;

/// A proposed follow-up with its static priority (higher ranks first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub question: String,
  pub priority: u8,
}

impl Candidate {
  pub fn new(question: impl Into<String>, priority: u8) -> Self {
    Self { question: question.into(), priority }
  }
}

/// Question text of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ask {
  Fixed(&'static str),
  /// Template with an `{area}` placeholder
  ForArea(&'static str),
}

pub struct Rule<C> {
  pub priority: u8,
  pub ask: Ask,
  pub when: fn(&C) -> bool,
}

/// Anything a rule group can be evaluated against
pub trait RuleContext {
  fn area(&self) -> Option<&str> {
    None
  }
}

pub fn evaluate<C: RuleContext>(rules: &[Rule<C>], context: &C) -> Vec<Candidate> {
  rules
    .iter()
    .filter(|rule| (rule.when)(context))
    .filter_map(|rule| {
      let question = match rule.ask {
        Ask::Fixed(text) => text.to_string(),
        Ask::ForArea(template) => template.replace("{area}", context.area()?),
      };
      Some(Candidate::new(question, rule.priority))
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Conversation group
// ---------------------------------------------------------------------------

/// Recent tags plus the literal latest reply
#[derive(Debug, Clone)]
pub struct ConversationContext {
  latest: String,
  tags: TagSet,
  area: Option<&'static str>,
}

impl ConversationContext {
  pub fn new(latest_text: &str, history_tags: &TagSet, latest_tags: &TagSet) -> Self {
    let tags = history_tags.union(latest_tags);
    let area = tags.latest_area();
    Self { latest: latest_text.to_lowercase(), tags, area }
  }

  fn discussed(&self, tag: &str) -> bool {
    self.tags.contains(tag)
  }

  fn says(&self, needle: &str) -> bool {
    self.latest.contains(needle)
  }

  fn says_any(&self, needles: &[&str]) -> bool {
    needles.iter().any(|needle| self.says(needle))
  }

  fn has_area(&self) -> bool {
    self.area.is_some()
  }

  /// True while none of `"<area> <detail>"` appears in the latest reply
  fn area_lacks(&self, details: &[&str]) -> bool {
    match self.area {
      Some(area) => !details.iter().any(|detail| self.says(&format!("{area} {detail}"))),
      None => false,
    }
  }

  fn about_process(&self) -> bool {
    self.says_any(&["process", "procedure", "steps"])
  }
}

impl RuleContext for ConversationContext {
  fn area(&self) -> Option<&str> {
    self.area
  }
}

pub static CONVERSATION_RULES: &[Rule<ConversationContext>] = &[
  // HDB
  Rule {
    priority: 8,
    ask: Ask::Fixed("How does BTO compare to resale HDB in terms of value?"),
    when: |c| c.discussed("hdb") && c.discussed("bto") && !c.discussed("resale"),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("Should I consider BTO instead of resale?"),
    when: |c| c.discussed("hdb") && c.discussed("resale") && !c.discussed("bto"),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Which is better for me: BTO or resale HDB?"),
    when: |c| c.discussed("hdb") && !c.discussed("bto") && !c.discussed("resale"),
  },
  Rule {
    priority: 9,
    ask: Ask::Fixed("What HDB grants am I eligible for?"),
    when: |c| c.discussed("hdb") && !c.discussed("grant"),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("What are the income ceiling requirements?"),
    when: |c| c.discussed("hdb") && c.discussed("eligibility") && !c.says("income ceiling"),
  },
  Rule {
    priority: 5,
    ask: Ask::Fixed("Can singles buy HDB flats?"),
    when: |c| c.discussed("hdb") && c.discussed("eligibility") && !c.says("single"),
  },
  // Condo
  Rule {
    priority: 6,
    ask: Ask::Fixed("Are condos a good investment right now?"),
    when: |c| c.discussed("condo") && !c.discussed("investment"),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("What should I know about condo maintenance fees?"),
    when: |c| c.discussed("condo") && !c.says_any(&["maintenance", "fee"]),
  },
  Rule {
    priority: 5,
    ask: Ask::Fixed("What facilities should I look for in a good condo?"),
    when: |c| c.discussed("condo") && !c.discussed("facilities") && !c.discussed("amenities"),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("Which areas have the best value for condos right now?"),
    when: |c| c.discussed("condo") && !c.has_area(),
  },
  // Financing
  Rule {
    priority: 8,
    ask: Ask::Fixed("What are the current interest rates for home loans?"),
    when: |c| c.discussed("loan") && !c.says_any(&["interest", "rate"]),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("What loan tenure should I choose?"),
    when: |c| c.discussed("loan") && !c.says_any(&["term", "tenure", "duration"]),
  },
  Rule {
    priority: 9,
    ask: Ask::Fixed("How much down payment will I need?"),
    when: |c| c.discussed("loan") && !c.says_any(&["down payment", "downpayment"]),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("How can I best utilize my CPF for property purchase?"),
    when: |c| c.discussed("loan") && !c.says("cpf"),
  },
  Rule {
    priority: 5,
    ask: Ask::Fixed("How do TDSR and MSR affect my loan eligibility?"),
    when: |c| c.discussed("loan") && !c.says_any(&["tdsr", "msr", "debt"]),
  },
  // Investment
  Rule {
    priority: 8,
    ask: Ask::Fixed("Which areas have the best rental yields currently?"),
    when: |c| c.discussed("investment") && !c.says_any(&["rental yield", "yield"]),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Which properties have high rental yield in Singapore?"),
    when: |c| c.discussed("investment") && !c.says_any(&["rental yield", "yield"]),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Which property types have the best capital appreciation?"),
    when: |c| c.discussed("investment") && !c.says_any(&["capital", "appreciation"]),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("Which condos have high en bloc potential?"),
    when: |c| c.discussed("investment") && !c.says_any(&["capital", "appreciation"]),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("What are the tax implications of property investment?"),
    when: |c| c.discussed("investment") && !c.discussed("tax") && !c.discussed("absd"),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("What are the additional buyer's stamp duties (ABSD)?"),
    when: |c| c.discussed("investment") && !c.discussed("tax") && !c.discussed("absd"),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("Can I buy a second property without ABSD?"),
    when: |c| c.discussed("investment") && !c.discussed("tax") && !c.discussed("absd"),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("Is it a good time to buy property in Singapore 2025?"),
    when: |c| c.discussed("investment"),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("What is the best property to invest in Singapore?"),
    when: |c| c.discussed("investment"),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("Will property prices drop in 2025?"),
    when: |c| c.discussed("investment"),
  },
  Rule {
    priority: 5,
    ask: Ask::Fixed("Should I wait for the market to cool before buying?"),
    when: |c| c.discussed("investment"),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("How to calculate rental yield in Singapore?"),
    when: |c| c.discussed("investment"),
  },
  // Area
  Rule {
    priority: 8,
    ask: Ask::ForArea("What's the price range for properties in {area}?"),
    when: |c| c.area_lacks(&["price", "cost"]),
  },
  Rule {
    priority: 6,
    ask: Ask::ForArea("What amenities are available in {area}?"),
    when: |c| c.area_lacks(&["amenities", "facilities"]),
  },
  Rule {
    priority: 7,
    ask: Ask::ForArea("How convenient is public transportation in {area}?"),
    when: |c| c.area_lacks(&["mrt", "transport"]),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("Where can I find affordable condos near MRT?"),
    when: |c| c.area_lacks(&["mrt", "transport"]),
  },
  Rule {
    priority: 5,
    ask: Ask::Fixed("What condo is closest to MRT and mall?"),
    when: |c| c.area_lacks(&["mrt", "transport"]),
  },
  Rule {
    priority: 5,
    ask: Ask::Fixed("Which property is near upcoming MRT lines?"),
    when: |c| c.area_lacks(&["mrt", "transport"]),
  },
  Rule {
    priority: 5,
    ask: Ask::ForArea("What are the good schools in {area}?"),
    when: |c| c.area_lacks(&["school"]),
  },
  Rule {
    priority: 4,
    ask: Ask::Fixed("Which HDB towns have the best schools?"),
    when: |c| c.area_lacks(&["school"]),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("Which area is best to buy property in Singapore?"),
    when: |c| !c.has_area(),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Best area to invest in property in Singapore 2025?"),
    when: |c| !c.has_area(),
  },
  // Process
  Rule {
    priority: 8,
    ask: Ask::Fixed("How long does this process typically take?"),
    when: |c| c.about_process() && !c.says_any(&["time", "long", "duration"]),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("What documents do I need to prepare?"),
    when: |c| c.about_process() && !c.says_any(&["document", "paperwork"]),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("What fees are involved in this process?"),
    when: |c| c.about_process() && !c.says_any(&["fee", "cost"]),
  },
  // Fallbacks, always last
  Rule {
    priority: 3,
    ask: Ask::Fixed("What are the current market trends in Singapore?"),
    when: |_| true,
  },
  Rule { priority: 3, ask: Ask::Fixed("What common mistakes should I avoid?"), when: |_| true },
  Rule { priority: 4, ask: Ask::Fixed("What hidden costs should I be aware of?"), when: |_| true },
  Rule { priority: 2, ask: Ask::Fixed("How can I get the best deal?"), when: |_| true },
  Rule { priority: 2, ask: Ask::Fixed("What are the next steps I should take?"), when: |_| true },
  Rule {
    priority: 3,
    ask: Ask::Fixed("How will the property market change in the coming year?"),
    when: |_| true,
  },
  Rule { priority: 4, ask: Ask::Fixed("What neighborhoods are becoming popular?"), when: |_| true },
];

/// Candidate pool from the recent conversation, unsorted
pub fn build_candidates(
  latest_text: &str,
  history_tags: &TagSet,
  latest_tags: &TagSet,
) -> Vec<Candidate> {
  let context = ConversationContext::new(latest_text, history_tags, latest_tags);
  evaluate(CONVERSATION_RULES, &context)
}

// ---------------------------------------------------------------------------
// Property-specific group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProfileContext {
  hdb: bool,
  condo: bool,
  signals: ProfileSignals,
}

impl ProfileContext {
  pub fn new(latest_text: &str, history: &[ConversationTurn]) -> Self {
    Self {
      hdb: topics::mentioned_anywhere("hdb", history, latest_text),
      condo: topics::mentioned_anywhere("condo", history, latest_text),
      signals: topics::extract_profile_signals(history, latest_text),
    }
  }

  fn has(&self, signal: Signal) -> bool {
    self.signals.has(signal)
  }

  fn lacks(&self, signals: &[Signal]) -> bool {
    !self.signals.has_any(signals)
  }
}

impl RuleContext for ProfileContext {}

pub static PROFILE_RULES: &[Rule<ProfileContext>] = &[
  // HDB
  Rule {
    priority: 9,
    ask: Ask::Fixed("How does BTO compare to resale HDB in terms of value?"),
    when: |c| c.hdb && c.has(Signal::Bto) && !c.has(Signal::Resale),
  },
  Rule {
    priority: 9,
    ask: Ask::Fixed("Should I consider BTO instead of resale?"),
    when: |c| c.hdb && c.has(Signal::Resale) && !c.has(Signal::Bto),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("Which is better for me: BTO or resale HDB?"),
    when: |c| c.hdb && c.lacks(&[Signal::Bto, Signal::Resale]),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("What HDB grants am I eligible for?"),
    when: |c| c.hdb && !c.has(Signal::Grant),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("Can singles buy a HDB flat?"),
    when: |c| c.hdb && c.lacks(&[Signal::Single, Signal::Family]),
  },
  // Condo
  Rule {
    priority: 8,
    ask: Ask::Fixed("What is Executive Condo (EC) and how is it different from condo?"),
    when: |c| c.condo && !c.has(Signal::ExecutiveCondo),
  },
  Rule {
    priority: 9,
    ask: Ask::Fixed("Are condos a good investment right now?"),
    when: |c| c.condo && !c.has(Signal::Investment),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Where can I find affordable condos near MRT?"),
    when: |c| c.condo && !c.has(Signal::Location),
  },
  Rule {
    priority: 6,
    ask: Ask::Fixed("Is freehold better than leasehold?"),
    when: |c| c.condo && c.lacks(&[Signal::Freehold, Signal::Leasehold]),
  },
  // Neither property type yet
  Rule {
    priority: 9,
    ask: Ask::Fixed("Should I buy a condo or HDB?"),
    when: |c| !c.hdb && !c.condo,
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("What is the difference between HDB, EC, and condo?"),
    when: |c| !c.hdb && !c.condo,
  },
  // Financing
  Rule {
    priority: 9,
    ask: Ask::Fixed("How much downpayment do I need for a condo or HDB?"),
    when: |c| !c.has(Signal::Downpayment),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("How much can I borrow for a home loan in Singapore?"),
    when: |c| !c.has(Signal::Loan),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("How do I use my CPF to buy a house?"),
    when: |c| !c.has(Signal::Cpf),
  },
  // Buyer profile and process
  Rule {
    priority: 8,
    ask: Ask::Fixed("Can PRs or foreigners buy property in Singapore?"),
    when: |c| c.lacks(&[Signal::PermanentResident, Signal::Foreigner]),
  },
  Rule {
    priority: 8,
    ask: Ask::Fixed("What are the steps to buy a property in Singapore?"),
    when: |c| !c.has(Signal::Process),
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Do I need a property agent to buy a house?"),
    when: |c| !c.has(Signal::Agent),
  },
  // Market timing and location
  Rule {
    priority: 6,
    ask: Ask::Fixed("Is it a good time to buy property in Singapore 2025?"),
    when: |_| true,
  },
  Rule {
    priority: 7,
    ask: Ask::Fixed("Which area is best to buy property in Singapore?"),
    when: |c| !c.has(Signal::Location),
  },
];

/// Candidate pool from the whole conversation, unsorted
pub fn build_profile_candidates(latest_text: &str, history: &[ConversationTurn]) -> Vec<Candidate> {
  let context = ProfileContext::new(latest_text, history);
  evaluate(PROFILE_RULES, &context)
}
