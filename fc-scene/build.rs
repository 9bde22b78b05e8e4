const NAVIGATOR_NAMES: &[&str] = &["BROWSER", "DEBUG"];

fn navigator_name_to_feature_name(navigator_name: &str) -> String {
    format!("navigator-{}", navigator_name.to_lowercase().replace('_', "-"))
}

fn main() -> Result<(), String> {
    let names: Vec<&str> = NAVIGATOR_NAMES
        .iter()
        .copied()
        .filter(|name| std::env::var(format!("CARGO_FEATURE_NAVIGATOR_{name}")).is_ok())
        .collect();

    match names.len() {
        1 => Ok(()),
        _ => {
            let names = names
                .into_iter()
                .map(navigator_name_to_feature_name)
                .collect::<Vec<_>>()
                .join(", ");

            let options = NAVIGATOR_NAMES
                .iter()
                .copied()
                .map(navigator_name_to_feature_name)
                .collect::<Vec<_>>()
                .join(", ");

            Err(format!(
                "fc-scene must be built with EXACTLY ONE navigator feature enabled. Got features: [{names}]. Options are: [{options}]",
            ))
        }
    }
}
