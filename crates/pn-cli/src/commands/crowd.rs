use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use pn_core::{Crowd, CrowdConfig, TalkedAgents, default_roster, persona_at};

pub fn run(seed: u64, size: usize, hands: usize, talked: &[usize]) -> Result<(), String> {
    let roster = default_roster();
    if let Some(bad) = talked.iter().find(|&&i| i >= roster.len()) {
        return Err(format!(
            "unknown persona index {bad} (roster has {})",
            roster.len()
        ));
    }

    let config = CrowdConfig::default().with_size(size).with_hands(hands);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut crowd = Crowd::generate(roster.len(), &config, &mut rng);
    let talked = TalkedAgents::from_indices(roster.len(), talked.iter().copied());
    if !talked.is_empty() {
        crowd = crowd.with_hands_raised(&talked, hands, &mut rng);
    }

    println!(
        "  {} {}",
        "Press Room".bold(),
        format!("({} members, seed={seed})", crowd.len()).dimmed()
    );
    if !talked.is_empty() {
        let names: Vec<&str> = talked
            .iter()
            .filter_map(|i| roster.get(i).map(|p| p.name.as_str()))
            .collect();
        println!("  Already talked: {}", names.join(", "));
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Seat", "Avatar", "Member", "Reporter", "Network", "Hand"]);
    for (seat, member) in crowd.members().iter().enumerate() {
        let persona = persona_at(&roster, member.persona_index).map_err(|e| e.to_string())?;
        let hand = if member.has_question { "raised" } else { "" };
        table.add_row(vec![
            (seat + 1).to_string(),
            member.seed.to_string(),
            member.id.to_string(),
            persona.name.clone(),
            persona.network.clone(),
            hand.to_string(),
        ]);
    }
    println!("{table}");
    println!();

    let raised = crowd.raised().count();
    if raised == 0 {
        println!(
            "  {}",
            "No hands raised: every persona in the room has talked this round.".yellow()
        );
    } else {
        println!("  {raised} hands raised");
    }
    Ok(())
}
