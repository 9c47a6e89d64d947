//! Embedded templates for generated files.

use include_dir::{Dir, include_dir};
use minijinja::{Environment, Value};

use crate::domain::AppError;

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates");

pub const CONFIG_TEMPLATE: &str = "calibre-portable.toml.j2";
pub const LAUNCHER_TEMPLATE: &str = "calibre-portable.command.j2";

/// Render an embedded template with the given context.
pub fn render(name: &str, ctx: Value) -> Result<String, AppError> {
    let source = TEMPLATES_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| AppError::Template {
            name: name.to_string(),
            details: "template is not embedded".to_string(),
        })?;

    let env = Environment::new();
    let template = env.template_from_named_str(name, source).map_err(|e| AppError::Template {
        name: name.to_string(),
        details: e.to_string(),
    })?;
    let mut rendered = template
        .render(ctx)
        .map_err(|e| AppError::Template { name: name.to_string(), details: e.to_string() })?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Generation stamp shown in file headers.
pub fn generated_at() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}
