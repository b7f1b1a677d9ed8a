//! Theme resolution demo
//!
//! Run with:
//! `RUST_LOG=hue_theme=debug cargo run -p hue_theme --example resolve`

use hue_theme::{
    AccentColor, ColorScheme, MemoryReader, SourceLocations, ThemeEngine, ThemingConfiguration,
};
use tracing_subscriber::EnvFilter;

const TOKENS: &str = r##"
[[tokens]]
id = "space.4"
type = "spacing"
value = "16px"

[[tokens]]
id = "color.brand"
type = "color"
value = "#1e66f5"
"##;

const THEME: &str = r##"
id = "studio"
name = "Studio"

[base_tokens."color.bg"]
type = "color"
value = "#eff1f5"

[base_tokens."button.bg"]
type = "reference"
value = "color.brand"

[base_tokens."button.bg-hover"]
type = "color"
value = "#7287fd"

[[variants]]
applies_to_scheme = "dark"

[variants.tokens."color.bg"]
type = "color"
value = "#1e1e2e"

[accent_modifiable_tokens]
"button.bg" = "direct-replace"
"button.bg-hover" = { lighten = 0.2 }
"##;

const CONFIG: &str = r##"
theme = "studio"
scheme = "light"
"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let reader = MemoryReader::new()
        .with_source("tokens.toml", TOKENS)
        .with_source("studio.toml", THEME);
    let engine = ThemeEngine::new(reader);
    let mut changes = engine.subscribe();

    let config = ThemingConfiguration::from_toml_str(CONFIG)?;
    let state = engine.initialize(config.clone(), SourceLocations::new(["tokens.toml"], ["studio.toml"]));
    print_state("initial", &state);

    let dark = config
        .with_scheme(ColorScheme::Dark)
        .with_accent(AccentColor::parse("#d20f39")?);
    engine.update_configuration(dark)?;

    while let Ok(state) = changes.try_recv() {
        print_state("changed", &state);
    }

    for (name, value) in engine.get_applied_state().to_css_variable_map() {
        println!("--{name}: {value};");
    }
    Ok(())
}

fn print_state(label: &str, state: &hue_theme::AppliedThemeState) {
    println!("[{label}] {} ({})", state.theme_id, state.scheme);
    for (id, value) in state.iter() {
        println!("  {id} = {value}");
    }
}
