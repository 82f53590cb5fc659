use std::path::Path;

use placegrid_core::{LocalityPreference, PlacegridConfig};
use placegrid_placement::{config_to_inputs, config_to_strategy};

pub fn plan(file: &str, format: &str) -> anyhow::Result<()> {
    let preferences = compute(Path::new(file))?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&preferences)?);
        }
        _ => {
            print!("{}", format_preferences(&preferences));
        }
    }

    Ok(())
}

fn compute(path: &Path) -> anyhow::Result<Vec<LocalityPreference>> {
    let config = PlacegridConfig::from_file(path)?;
    let strategy = config_to_strategy(&config)?;
    let inputs = config_to_inputs(&config)?;

    tracing::debug!(
        file = %path.display(),
        hosts = inputs.local_tasks.len(),
        pending = inputs.pending.len(),
        "loaded scenario"
    );

    Ok(strategy.compute_placements(
        inputs.num_containers,
        inputs.locality_aware_tasks,
        &inputs.local_tasks,
        &inputs.allocation,
        &inputs.pending,
    )?)
}

fn format_preferences(preferences: &[LocalityPreference]) -> String {
    let mut out = String::new();
    for (i, pref) in preferences.iter().enumerate() {
        if pref.is_unconstrained() {
            out.push_str(&format!("#{i:<3} <any>\n"));
        } else {
            out.push_str(&format!(
                "#{i:<3} hosts=[{}] racks=[{}]\n",
                pref.hosts.join(", "),
                pref.racks.join(", ")
            ));
        }
    }
    out
}
