//! # Field Classifiers Module
//!
//! ## Purpose
//! Per-field metadata classification over ruling text using ordered pattern
//! rules. Each classifier is an independent pure function: it maps the
//! document text to exactly one value from its fixed label set, or to the
//! `UNIDENTIFIED` sentinel when no rule matches.
//!
//! ## Input/Output Specification
//! - **Input**: Full document text (classifiers that are case-insensitive
//!   receive a single uppercased copy; span-preserving classifiers receive
//!   the raw text)
//! - **Output**: One classified value per field; the subject-matter classifier
//!   returns every matching topic
//!
//! ## Rule Ordering
//! Several classifiers try an ordered list of `(label, pattern)` rules where
//! the first match wins. Order is semantically load-bearing: more specific
//! patterns precede broader ones (e.g. "PARCIALMENTE PROVIDO" must be decided
//! before plain "PROVIDO").

use crate::errors::{Result, SearchError};
use crate::{AppealType, Appellant, Outcome, UNIDENTIFIED};
use regex::Regex;

/// Fixed topic table evaluated by the subject-matter classifier, in output
/// order. All entries are checked independently; matching is not mutually
/// exclusive.
const SUBJECT_MATTER_RULES: &[(&str, &str)] = &[
    ("EXECUÇÃO PENAL", r"EXECU[ÇC][ÃA]O\s+PENAL"),
    ("LIVRAMENTO CONDICIONAL", r"LIVRAMENTO\s+CONDICIONAL"),
    ("PROGRESSÃO DE REGIME", r"PROGRESS[ÃA]O\s+DE\s+REGIME"),
    ("DOSIMETRIA DA PENA", r"DOSIMETRIA\s+(DA\s+)?PENA"),
    ("RECONHECIMENTO FOTOGRÁFICO", r"RECONHECIMENTO\s+FOTOGR[ÁA]FICO"),
    ("TRÁFICO DE DROGAS", r"TR[ÁA]FICO\s+DE\s+DROGAS"),
    ("ROUBO", r"\bROUBO\b"),
    ("FURTO", r"\bFURTO\b"),
    ("HOMICÍDIO", r"HOMIC[ÍI]DIO"),
    ("LESÃO CORPORAL", r"LES[ÃA]O\s+CORPORAL"),
    ("VIOLÊNCIA DOMÉSTICA", r"VIOL[ÊE]NCIA\s+DOM[ÉE]STICA"),
    ("PRESCRIÇÃO", r"PRESCRI[ÇC][ÃA]O"),
    ("NULIDADE", r"NULIDADE"),
    ("ABSOLVIÇÃO", r"ABSOLVI[ÇC][ÃA]O"),
    ("DESCLASSIFICAÇÃO", r"DESCLASSIFICA[ÇC][ÃA]O"),
    ("REGIME INICIAL", r"REGIME\s+INICIAL"),
    ("SUBSTITUIÇÃO DE PENA", r"SUBSTITUI[ÇC][ÃA]O\s+(DA\s+)?PENA"),
];

/// All classified metadata fields for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFields {
    pub appeal_type: AppealType,
    pub case_number: String,
    pub judging_body: String,
    pub ruling_date: String,
    pub outcome: Outcome,
    pub appellant: Appellant,
    pub subject_matters: Vec<String>,
}

/// Compiled classifier rules, built once and shared across documents.
///
/// Classifier methods take borrowed text and hold no mutable state, so one
/// instance can be used from multiple indexing workers concurrently.
pub struct FieldClassifiers {
    appeal_rules: Vec<(AppealType, Regex)>,
    case_number: Regex,
    judging_body: Regex,
    date_rules: Vec<Regex>,
    outcome_granted: Regex,
    outcome_partial: Regex,
    outcome_denied: Regex,
    outcome_not_considered: Regex,
    outcome_order_granted: Regex,
    outcome_order_denied: Regex,
    appellant_rules: Vec<(Appellant, Regex)>,
    subject_rules: Vec<(&'static str, Regex)>,
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| SearchError::Classifier {
        field: field.to_string(),
        details: e.to_string(),
    })
}

impl FieldClassifiers {
    /// Compile all classifier patterns
    pub fn new() -> Result<Self> {
        let appeal_rules = vec![
            (AppealType::CriminalAppeal, compile("appeal_type", r"APELA[ÇC][ÃA]O\s+CRIMINAL")?),
            (AppealType::ExecutionGrievance, compile("appeal_type", r"AGRAVO\s+(EM\s+)?EXECU[ÇC][ÃA]O")?),
            (AppealType::HabeasCorpus, compile("appeal_type", r"HABEAS\s+CORPUS")?),
            (AppealType::InterlocutoryAppeal, compile("appeal_type", r"RECURSO\s+EM\s+SENTIDO\s+ESTRITO")?),
            (AppealType::InfringementMotion, compile("appeal_type", r"EMBARGOS\s+INFRINGENTES")?),
            (AppealType::CriminalReview, compile("appeal_type", r"REVIS[ÃA]O\s+CRIMINAL")?),
        ];

        let appellant_rules = vec![
            (Appellant::Defense, compile("appellant", r"RECORRENTE[:\s]+(DEFESA|DEFENSORIA|ADVOGAD)")?),
            (Appellant::Prosecution, compile("appellant", r"RECORRENTE[:\s]+(MINIST[ÉE]RIO\s+P[ÚU]BLICO|MP)")?),
            (Appellant::Defense, compile("appellant", r"APELANTE[:\s]+.{0,100}(DEFESA|DEFENSORIA)")?),
            (Appellant::Prosecution, compile("appellant", r"APELANTE[:\s]+.{0,100}(MINIST[ÉE]RIO\s+P[ÚU]BLICO|MP)")?),
        ];

        let subject_rules = SUBJECT_MATTER_RULES
            .iter()
            .map(|(topic, pattern)| Ok((*topic, compile("subject_matters", pattern)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            appeal_rules,
            case_number: compile("case_number", r"\d{7}-\d{2}\.\d{4}\.\d\.\d{2}\.\d{4}")?,
            judging_body: compile(
                "judging_body",
                r"(PRIMEIRA|SEGUNDA|TERCEIRA|QUARTA|QUINTA|SEXTA|S[ÉE]TIMA|OITAVA)\s+C[ÂA]MARA\s+CRIMINAL",
            )?,
            date_rules: vec![
                compile("ruling_date", r"\d{2}/\d{2}/\d{4}")?,
                compile("ruling_date", r"\d{1,2}\s+de\s+\w+\s+de\s+\d{4}")?,
            ],
            outcome_granted: compile(
                "outcome",
                r"(RECURSO|AGRAVO|APELA[ÇC][ÃA]O|HABEAS)\s+(CONHECIDO\s+E\s+)?PROVIDO",
            )?,
            outcome_partial: compile("outcome", r"PARCIALMENTE\s+PROVIDO")?,
            outcome_denied: compile(
                "outcome",
                r"(RECURSO|AGRAVO|APELA[ÇC][ÃA]O|HABEAS)\s+(CONHECIDO\s+E\s+)?DESPROVIDO",
            )?,
            outcome_not_considered: compile(
                "outcome",
                r"(RECURSO|AGRAVO|APELA[ÇC][ÃA]O|HABEAS)\s+N[ÃA]O\s+CONHECIDO",
            )?,
            outcome_order_granted: compile("outcome", r"ORDEM\s+(CONCEDIDA|DEFERIDA)")?,
            outcome_order_denied: compile("outcome", r"ORDEM\s+(DENEGADA|INDEFERIDA)")?,
            appellant_rules,
            subject_rules,
        })
    }

    /// Run every classifier over one document's text.
    ///
    /// Uppercases the text once for the case-insensitive classifiers; the
    /// case-number and date classifiers run over the raw text so the matched
    /// span is returned verbatim.
    pub fn classify(&self, text: &str) -> ClassifiedFields {
        let upper = text.to_uppercase();

        ClassifiedFields {
            appeal_type: self.appeal_type(&upper),
            case_number: self.case_number(text),
            judging_body: self.judging_body(&upper),
            ruling_date: self.ruling_date(text),
            outcome: self.outcome(&upper),
            appellant: self.appellant(&upper),
            subject_matters: self.subject_matters(&upper),
        }
    }

    /// First matching appeal-type rule wins; order is load-bearing
    pub fn appeal_type(&self, upper: &str) -> AppealType {
        for (label, pattern) in &self.appeal_rules {
            if pattern.is_match(upper) {
                return *label;
            }
        }
        AppealType::Unidentified
    }

    /// First occurrence of the structural case-number pattern, verbatim
    pub fn case_number(&self, text: &str) -> String {
        match self.case_number.find(text) {
            Some(m) => m.as_str().to_string(),
            None => UNIDENTIFIED.to_string(),
        }
    }

    /// Ordinal-word chamber name, returned in title case
    pub fn judging_body(&self, upper: &str) -> String {
        match self.judging_body.find(upper) {
            Some(m) => crate::text_processing::title_case(m.as_str()),
            None => UNIDENTIFIED.to_string(),
        }
    }

    /// Numeric `dd/mm/yyyy` first, then the spelled-out form; raw matched text
    pub fn ruling_date(&self, text: &str) -> String {
        for pattern in &self.date_rules {
            if let Some(m) = pattern.find(text) {
                return m.as_str().to_string();
            }
        }
        UNIDENTIFIED.to_string()
    }

    /// Fixed-priority outcome rules; "PARCIALMENTE PROVIDO" beats "PROVIDO"
    pub fn outcome(&self, upper: &str) -> Outcome {
        if self.outcome_granted.is_match(upper) {
            if self.outcome_partial.is_match(upper) {
                return Outcome::PartiallyGranted;
            }
            return Outcome::Granted;
        }
        if self.outcome_denied.is_match(upper) {
            return Outcome::Denied;
        }
        if self.outcome_not_considered.is_match(upper) {
            return Outcome::NotConsidered;
        }
        if self.outcome_order_granted.is_match(upper) {
            return Outcome::OrderGranted;
        }
        if self.outcome_order_denied.is_match(upper) {
            return Outcome::OrderDenied;
        }
        Outcome::Unidentified
    }

    /// Party heading rules; defense checks precede prosecution checks per
    /// heading, and "APELANTE:" allows up to 100 intervening characters
    pub fn appellant(&self, upper: &str) -> Appellant {
        for (label, pattern) in &self.appellant_rules {
            if pattern.is_match(upper) {
                return *label;
            }
        }
        Appellant::Unidentified
    }

    /// Every matching topic from the fixed table, in table order; the
    /// sentinel only when nothing matched
    pub fn subject_matters(&self, upper: &str) -> Vec<String> {
        let matched: Vec<String> = self
            .subject_rules
            .iter()
            .filter(|(_, pattern)| pattern.is_match(upper))
            .map(|(topic, _)| topic.to_string())
            .collect();

        if matched.is_empty() {
            vec![UNIDENTIFIED.to_string()]
        } else {
            matched
        }
    }
}
