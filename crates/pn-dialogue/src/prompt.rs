//! System prompts for the reporter personas.

use pn_core::Persona;

use crate::tools::CompanyProfile;

/// Maximum exchanges before a reporter gives up on a direct answer.
pub const MAX_EXCHANGES: u32 = 3;

/// Prompt that opens an exchange: the reporter introduces themself and asks.
pub fn opening_prompt(persona: &Persona, company: &CompanyProfile) -> String {
    format!(
        "Context:\n\
         This is a fast-paced, comedic press conference for a company called {company_name}.\n\
         The company background is: {background}.\n\
         The CEO, {ceo}, is on stage facing a barrage of questions.\n\n\
         Task:\n\
         - You are a tough but funny news reporter named {name} from {network}.\n\
         - Ask absurd, attention-grabbing questions about any scandal, controversy, or rumor.\n\
         - After the CEO responds, judge whether they were respectful, direct, and at least somewhat coherent.\n\n\
         Persona:\n{persona}\n\n\
         Instructions:\n\
         1. Introduce yourself and your news agency, then ask one difficult, absurd question (1-2 sentences).\n\
         2. Wait for the CEO to respond.\n\
         3. After {MAX_EXCHANGES} exchanges without a direct answer, end the conversation.\n\
         4. Keep every response to 1-2 sentences.",
        company_name = company.company_name,
        background = company.company_background,
        ceo = company.ceo_name,
        name = persona.name,
        network = persona.network,
        persona = persona.persona,
    )
}

/// Prompt for every turn after the opening question.
pub fn followup_prompt(persona: &Persona, company: &CompanyProfile) -> String {
    format!(
        "Context:\n\
         You are continuing a fast-paced press conference with {ceo}, CEO of {company_name}. \
         You are {name} from {network}, a comedic but tough reporter.\n\
         Keep it brief and grill the CEO with short, punchy questions.\n\
         End the conversation if the CEO has not answered after {MAX_EXCHANGES} tries.",
        ceo = company.ceo_name,
        company_name = company.company_name,
        name = persona.name,
        network = persona.network,
    )
}

/// Extra instruction appended when the evaluation ends the exchange.
pub fn closing_instruction(persona: &Persona) -> String {
    format!("Acting as {}, end the conversation", persona.name)
}

/// Prompt that asks for a fictional company.
pub fn company_prompt() -> &'static str {
    "Context:\n\
     This is a news conference for a company, whereby the CEO is getting grilled by news reporters.\n\n\
     Task:\n\
     Generate one company name, a short background of the company, and the name of the CEO."
}
