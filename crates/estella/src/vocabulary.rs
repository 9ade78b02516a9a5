//! Keyword vocabularies
//!
//! Tags come from three disjoint categories: property types, concepts and
//! areas. A term is mentioned when any of its patterns occurs as a plain
//! substring of lower-cased text; there is no word-boundary check, so
//! "condominium" counts for `condo` and so does any word that merely
//! contains it.
//!
//! Profile signals are a separate, broader vocabulary read across the whole
//! conversation by the property-specific rules.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
  PropertyType,
  Concept,
  Area,
}

/// A vocabulary entry: the tag it produces and the substrings that trigger it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
  pub tag: &'static str,
  pub kind: TagKind,
  pub patterns: &'static [&'static str],
}

const fn property(tag: &'static str, patterns: &'static [&'static str]) -> Term {
  Term { tag, kind: TagKind::PropertyType, patterns }
}

const fn concept(tag: &'static str, patterns: &'static [&'static str]) -> Term {
  Term { tag, kind: TagKind::Concept, patterns }
}

const fn area(tag: &'static str) -> Term {
  Term { tag, kind: TagKind::Area, patterns: &[] }
}

pub const PROPERTY_TYPES: &[Term] = &[
  property("hdb", &["hdb"]),
  property("condo", &["condo", "condominium"]),
  property("landed", &["landed", "bungalow", "terrace"]),
];

pub const CONCEPTS: &[Term] = &[
  concept("bto", &["bto"]),
  concept("resale", &["resale"]),
  concept("rental", &["rental", "rent"]),
  concept("loan", &["loan", "mortgage"]),
  concept("financing", &["financing"]),
  concept("price", &["price"]),
  concept("cost", &["cost"]),
  concept("eligibility", &["eligibility"]),
  concept("agent", &["agent", "commission"]),
  concept("negotiate", &["negotiate"]),
  concept("grant", &["grant", "subsidy"]),
  concept("tax", &["tax"]),
  concept("stamp duty", &["stamp duty"]),
  concept("absd", &["absd"]),
  concept("bsd", &["bsd"]),
  concept("renovation", &["renovation"]),
  concept("furnishing", &["furnishing"]),
  concept("investment", &["investment", "roi"]),
  concept("return", &["return"]),
  concept("yield", &["yield"]),
  concept("capital gain", &["capital gain"]),
  concept("cash flow", &["cash flow"]),
  concept("lease", &["lease"]),
  concept("freehold", &["freehold"]),
  concept("location", &["location"]),
  concept("neighborhood", &["neighborhood"]),
  concept("schools", &["schools"]),
  concept("transport", &["transport"]),
  concept("amenities", &["amenities"]),
  concept("facilities", &["facilities"]),
  concept("maintenance", &["maintenance"]),
  concept("management fee", &["management fee"]),
];

// Areas match on their own name only.
pub const AREAS: &[Term] = &[
  area("punggol"),
  area("tampines"),
  area("bedok"),
  area("jurong"),
  area("woodlands"),
  area("yishun"),
  area("ang mo kio"),
  area("toa payoh"),
  area("central"),
  area("east"),
  area("west"),
  area("north"),
  area("south"),
  area("bishan"),
  area("pasir ris"),
  area("clementi"),
  area("bukit timah"),
  area("novena"),
  area("queenstown"),
  area("geylang"),
  area("marine parade"),
  area("serangoon"),
  area("kallang"),
  area("tanjong pagar"),
  area("holland village"),
  area("bugis"),
  area("orchard"),
  area("sentosa"),
  area("cbd"),
];

impl Term {
  /// Substrings that count as a mention of this term
  pub fn triggers(&self) -> impl Iterator<Item = &'static str> {
    let patterns: &'static [&'static str] = self.patterns;
    let own_name = patterns.is_empty().then_some(self.tag);
    own_name.into_iter().chain(patterns.iter().copied())
  }

  pub fn is_mentioned_in(&self, lowered: &str) -> bool {
    self.triggers().any(|pattern| lowered.contains(pattern))
  }
}

/// Every term across the three categories, property types first
pub fn terms() -> impl Iterator<Item = &'static Term> {
  PROPERTY_TYPES.iter().chain(CONCEPTS).chain(AREAS)
}

/// Broad conversation-wide signals used by the property-specific rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
  Bto,
  Resale,
  ExecutiveCondo,
  Freehold,
  Leasehold,
  Loan,
  Downpayment,
  Cpf,
  Grant,
  StampDuty,
  PermanentResident,
  Foreigner,
  Single,
  Family,
  Location,
  Price,
  Investment,
  Agent,
  Process,
  Selling,
  Renting,
}

// "pr" and "ec " also fire inside other words, e.g. "price" and "property".
pub const PROFILE_SIGNALS: &[(Signal, &[&str])] = &[
  (Signal::Bto, &["bto"]),
  (Signal::Resale, &["resale"]),
  (Signal::ExecutiveCondo, &["executive condo", "ec "]),
  (Signal::Freehold, &["freehold"]),
  (Signal::Leasehold, &["leasehold"]),
  (Signal::Loan, &["loan", "mortgage"]),
  (Signal::Downpayment, &["downpayment", "down payment"]),
  (Signal::Cpf, &["cpf"]),
  (Signal::Grant, &["grant", "subsidy"]),
  (Signal::StampDuty, &["absd", "stamp duty"]),
  (Signal::PermanentResident, &["pr", "permanent resident"]),
  (Signal::Foreigner, &["foreigner"]),
  (Signal::Single, &["single"]),
  (Signal::Family, &["married", "family"]),
  (Signal::Location, &["location", "area", "district"]),
  (Signal::Price, &["price", "cost", "afford"]),
  (Signal::Investment, &["invest", "roi", "yield"]),
  (Signal::Agent, &["agent", "commission"]),
  (Signal::Process, &["process", "procedure", "step"]),
  (Signal::Selling, &["sell", "selling"]),
  (Signal::Renting, &["rent", "lease", "tenant"]),
];
