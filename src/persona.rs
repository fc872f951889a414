//! Target-audience personas.
//!
//! A [`PersonaTable`] is built once at startup and only read afterwards. Its
//! order is the order the pipeline processes personas in.

use crate::error::AppError;

/// A named target-audience profile driving prompt content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Lookup key used on the command line, e.g. `STUDENT`.
    pub id: &'static str,
    /// Human readable label for terminal output.
    pub label: &'static str,
    /// File name component, e.g. `student` in `post_student.md`.
    pub slug: &'static str,
    /// Brand the content is published under.
    pub brand: &'static str,
    /// Blog topic for this audience.
    pub topic: &'static str,
    /// Who the writer is supposed to be.
    pub role: &'static str,
    pub tone: &'static str,
    pub pain_points: &'static [&'static str],
    pub call_to_action: &'static str,
}

impl Persona {
    /// System instruction sent with the blog request.
    pub fn system_instruction(&self) -> String {
        let pain_points = self
            .pain_points
            .iter()
            .map(|p| format!("- {p}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{role}\n\n\
             [Audience]\n{label}\n\n\
             [Pain points to address]\n{pain_points}\n\n\
             [Tone]\n{tone}\n\n\
             [Call to action]\n{cta}",
            role = self.role,
            label = self.label,
            tone = self.tone,
            cta = self.call_to_action,
        )
    }
}

const STUDENT: Persona = Persona {
    id: "STUDENT",
    label: "Middle and high school students who would rather solve one more problem than build a wrong-answer notebook",
    slug: "student",
    brand: "GENITEACHER",
    topic: "The smart wrong-answer notebook top students use: no scissors, no glue",
    role: "You are an edtech consultant writing for the top 1% of students in Korea. \
           The product is a smart pen that saves everything written on paper automatically.",
    tone: "Friendly and trustworthy, like an older student sharing a study hack.",
    pain_points: &[
        "Cutting and gluing problems into a notebook wastes study time",
        "Handwritten notes are hard to search and review before exams",
        "Mistakes repeat because nobody tracks which problem types go wrong",
    ],
    call_to_action: "Save this post and check the profile link to try it.",
};

const PARENT: Persona = Persona {
    id: "PARENT",
    label: "Parents who want to hand their child the most efficient study tool",
    slug: "parent",
    brand: "GENITEACHER",
    topic: "Is your child studying, or just copying? Study that leaves data behind",
    role: "You are an edtech consultant advising parents in Daechi-dong. \
           The product is a smart pen that turns every handwritten problem into study data.",
    tone: "Calm and evidence-driven, respectful of the parent's concern.",
    pain_points: &[
        "No visibility into what the child actually studied today",
        "Expensive tutoring without a record of progress",
        "Wrong-answer notebooks that are made once and never reviewed",
    ],
    call_to_action: "Check the profile link for a parent guide.",
};

const OWNER: Persona = Persona {
    id: "OWNER",
    label: "Academy and study-room owners looking for a differentiated management system",
    slug: "owner",
    brand: "GENITEACHER",
    topic: "What academy owners and top students have in common: wrong-answer notes without scissors",
    role: "You are an edtech consultant for academy owners considering a learning CRM. \
           The product is a smart pen plus dashboard that records every student's work automatically.",
    tone: "Professional and concrete, focused on operations and retention.",
    pain_points: &[
        "Staff spend hours photocopying and filing student work",
        "Parents ask for proof of progress the academy cannot show",
        "Competing academies look the same from the outside",
    ],
    call_to_action: "Send a DM for an onboarding consultation.",
};

const REPEATER: Persona = Persona {
    id: "REPEATER",
    label: "Self-studying exam repeaters and their parents",
    slug: "repeater",
    brand: "PK_ACADEMY",
    topic: "The key to self-study success: zero seconds waiting for answers",
    role: "You are a Daechi-dong admissions analyst who gets straight to the point. \
           The product is an AI instant question-answering system for self-study rooms.",
    tone: "Blunt and fact-heavy, no filler.",
    pain_points: &[
        "Time spent queuing to ask a question is time lost from studying",
        "Managed study rooms cannot answer subject questions",
        "Private tutoring solves questions but costs too much",
    ],
    call_to_action: "Check the profile link for a free trial week.",
};

/// Immutable, ordered persona lookup.
#[derive(Debug, Clone)]
pub struct PersonaTable {
    personas: Vec<Persona>,
}

impl PersonaTable {
    /// The built-in personas in processing order.
    pub fn builtin() -> Self {
        Self {
            personas: vec![STUDENT, PARENT, OWNER, REPEATER],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Case-insensitive lookup by id.
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    /// Resolve the requested ids, keeping table order. An empty request
    /// selects every persona.
    pub fn select(&self, ids: &[String]) -> Result<Vec<&Persona>, AppError> {
        if ids.is_empty() {
            return Ok(self.personas.iter().collect());
        }
        for id in ids {
            if self.get(id).is_none() {
                return Err(AppError::UnknownPersona(id.clone()));
            }
        }
        Ok(self
            .personas
            .iter()
            .filter(|p| ids.iter().any(|id| p.id.eq_ignore_ascii_case(id)))
            .collect())
    }
}
