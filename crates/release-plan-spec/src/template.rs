use crate::error::TemplateError;
use crate::parse::PACKAGES_KEY;

const INSTRUCTIONS: &[&str] = &[
    "# Describe the release you want to make.",
    "#",
    "# Set each package to one of:",
    "#   major | minor | patch     bump the current version",
    "#   X.Y.Z                     release exactly this version",
    "#   null                      leave it out of this release",
    "#   intentionally-skip        leave it out even though its dependents",
    "#                             need a major release",
];

const EDITOR_FOOTER: &[&str] = &[
    "#",
    "# Save and close the editor to continue. Leave every package at null",
    "# to release nothing.",
];

const MANUAL_FOOTER: &[&str] = &[
    "#",
    "# Edit this file, then run `cargo release-plan apply`.",
    "# Delete it to abandon the release.",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateOptions {
    /// The document is opened in an editor and read back when it closes,
    /// rather than left on disk for a later `apply`.
    pub editor_available: bool,
}

const YAML_RESERVED_WORDS: &[&str] = &[
    "null", "~", "true", "false", "yes", "no", "on", "off", "y", "n",
];

fn needs_quoting(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return true;
    };
    if !(first.is_ascii_alphanumeric() || first == '_') {
        return true;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return true;
    }
    if YAML_RESERVED_WORDS.contains(&name.to_ascii_lowercase().as_str()) {
        return true;
    }
    // Plain scalars like `1.0` or `12` would load as numbers.
    name.parse::<f64>().is_ok()
}

fn yaml_key(name: &str) -> String {
    if !needs_quoting(name) {
        return name.to_string();
    }
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Renders the document the user edits to describe a release: an
/// instruction header followed by every package awaiting a decision, each
/// set to `null`, sorted by name.
///
/// # Errors
///
/// Returns `TemplateError::EmptyReleaseSet` when there is nothing to list.
pub fn generate_template<'a>(
    package_names: impl IntoIterator<Item = &'a str>,
    options: &TemplateOptions,
) -> Result<String, TemplateError> {
    let mut names: Vec<&str> = package_names.into_iter().collect();
    if names.is_empty() {
        return Err(TemplateError::EmptyReleaseSet);
    }
    names.sort_unstable();
    names.dedup();

    let footer = if options.editor_available {
        EDITOR_FOOTER
    } else {
        MANUAL_FOOTER
    };

    let mut output = String::new();
    for line in INSTRUCTIONS.iter().chain(footer) {
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
    output.push_str(PACKAGES_KEY);
    output.push_str(":\n");
    for name in names {
        output.push_str("  ");
        output.push_str(&yaml_key(name));
        output.push_str(": null\n");
    }

    Ok(output)
}
