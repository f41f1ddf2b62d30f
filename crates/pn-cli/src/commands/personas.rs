use comfy_table::{ContentArrangement, Table};

use pn_core::default_roster;

pub fn run() -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Reporter", "Network", "Voice"]);
    for (i, persona) in default_roster().iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            persona.name.clone(),
            persona.network.clone(),
            persona.voice.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
