//! Font catalog – maps the editor's named font families to CSS
//! `font-family` stacks and Google Fonts import specs.
//!
//! The table is built once per process and never mutated, so it can be
//! shared freely between concurrent renders.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Name of the catalog entry used when a family cannot be resolved.
pub const DEFAULT_FONT: &str = "Default";

/// CSS value of the [`DEFAULT_FONT`] entry.
pub const DEFAULT_FONT_STACK: &str = "system-ui, -apple-system, sans-serif";

const GOOGLE_FONTS_CSS2: &str = "https://fonts.googleapis.com/css2";

const FULL: &[u16] = &[300, 400, 500, 600, 700];
const FROM_REGULAR: &[u16] = &[400, 500, 600, 700];
const REGULAR: &[u16] = &[400];
const REGULAR_BOLD: &[u16] = &[400, 700];
const LIGHT_REGULAR_BOLD: &[u16] = &[300, 400, 700];
const LIGHT_TO_SEMIBOLD_BOLD: &[u16] = &[300, 400, 600, 700];
const REGULAR_SEMIBOLD_BOLD: &[u16] = &[400, 600, 700];
const REGULAR_MEDIUM_BOLD: &[u16] = &[400, 500, 700];
const LIGHT_MEDIUM_BOLD: &[u16] = &[300, 400, 500, 700];

/// One selectable font family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// Display name used in style configs (e.g. `"Open Sans"`).
    pub name: &'static str,
    /// Complete CSS `font-family` value.
    pub stack: String,
    /// Weights served by Google Fonts. Empty for locally available fonts.
    pub weights: &'static [u16],
}

impl FontFace {
    /// `true` for the system stacks that never need a web-font import.
    pub fn is_system(&self) -> bool {
        self.weights.is_empty()
    }

    /// Family spec for the Google Fonts css2 API, e.g.
    /// `Open+Sans:wght@300;400;600;700`.
    pub fn google_spec(&self) -> Option<String> {
        if self.is_system() {
            return None;
        }
        let weights: Vec<String> = self.weights.iter().map(|w| w.to_string()).collect();
        Some(format!(
            "{}:wght@{}",
            self.name.replace(' ', "+"),
            weights.join(";")
        ))
    }
}

// (name, stack)
const SYSTEM_FONTS: &[(&str, &str)] = &[
    ("Default", DEFAULT_FONT_STACK),
    ("Serif", "Georgia, serif"),
    ("Mono", "monospace"),
    ("Sans", "sans-serif"),
];

// (name, generic fallback, hosted weights)
const HOSTED_FONTS: &[(&str, &str, &[u16])] = &[
    // Sans serif
    ("Inter", "sans-serif", FULL),
    ("Roboto", "sans-serif", LIGHT_MEDIUM_BOLD),
    ("Open Sans", "sans-serif", LIGHT_TO_SEMIBOLD_BOLD),
    ("Lato", "sans-serif", LIGHT_REGULAR_BOLD),
    ("Montserrat", "sans-serif", FULL),
    ("Poppins", "sans-serif", FULL),
    ("Nunito", "sans-serif", FULL),
    ("Raleway", "sans-serif", FULL),
    ("Source Sans Pro", "sans-serif", LIGHT_TO_SEMIBOLD_BOLD),
    ("Ubuntu", "sans-serif", LIGHT_MEDIUM_BOLD),
    ("Work Sans", "sans-serif", FULL),
    ("DM Sans", "sans-serif", REGULAR_MEDIUM_BOLD),
    ("Noto Sans", "sans-serif", FULL),
    ("Oswald", "sans-serif", FULL),
    ("PT Sans", "sans-serif", REGULAR_BOLD),
    ("Fira Sans", "sans-serif", FULL),
    ("Cabin", "sans-serif", FROM_REGULAR),
    ("Quicksand", "sans-serif", FULL),
    ("Dosis", "sans-serif", FULL),
    ("Barlow", "sans-serif", FULL),
    ("Rubik", "sans-serif", FULL),
    ("Manrope", "sans-serif", FULL),
    ("Plus Jakarta Sans", "sans-serif", FULL),
    ("Outfit", "sans-serif", FULL),
    ("Figtree", "sans-serif", FULL),
    ("Space Grotesk", "sans-serif", FULL),
    ("Sora", "sans-serif", FULL),
    ("Epilogue", "sans-serif", FULL),
    ("Lexend", "sans-serif", FULL),
    ("Red Hat Display", "sans-serif", FULL),
    ("IBM Plex Sans", "sans-serif", FULL),
    ("Public Sans", "sans-serif", FULL),
    ("Karla", "sans-serif", FULL),
    ("Hind", "sans-serif", FULL),
    ("Titillium Web", "sans-serif", LIGHT_TO_SEMIBOLD_BOLD),
    ("Varela Round", "sans-serif", REGULAR),
    ("Maven Pro", "sans-serif", FROM_REGULAR),
    ("Comfortaa", "sans-serif", FULL),
    ("Josefin Sans", "sans-serif", FULL),
    ("Libre Franklin", "sans-serif", FULL),
    // Serif
    ("Playfair Display", "serif", FROM_REGULAR),
    ("Merriweather", "serif", LIGHT_REGULAR_BOLD),
    ("Crimson Text", "serif", REGULAR_SEMIBOLD_BOLD),
    ("Lora", "serif", FROM_REGULAR),
    ("PT Serif", "serif", REGULAR_BOLD),
    ("Source Serif Pro", "serif", LIGHT_TO_SEMIBOLD_BOLD),
    ("Crimson Pro", "serif", FULL),
    ("Libre Baskerville", "serif", REGULAR_BOLD),
    ("EB Garamond", "serif", FROM_REGULAR),
    ("Bitter", "serif", FULL),
    ("Noto Serif", "serif", REGULAR_BOLD),
    ("Roboto Slab", "serif", FULL),
    ("Zilla Slab", "serif", FULL),
    ("Bree Serif", "serif", REGULAR),
    ("Crete Round", "serif", REGULAR),
    ("Vollkorn", "serif", FROM_REGULAR),
    ("Alegreya", "serif", FROM_REGULAR),
    ("Cormorant Garamond", "serif", FULL),
    ("Gentium Book Basic", "serif", REGULAR_BOLD),
    ("Lusitana", "serif", REGULAR_BOLD),
    ("Old Standard TT", "serif", REGULAR_BOLD),
    ("Spectral", "serif", FULL),
    ("Cinzel", "serif", FROM_REGULAR),
    ("Prata", "serif", REGULAR),
    ("Playfair Display SC", "serif", REGULAR_BOLD),
    ("Abril Fatface", "serif", REGULAR),
    ("Bodoni Moda", "serif", FROM_REGULAR),
    ("Cormorant", "serif", FULL),
    ("Fraunces", "serif", FULL),
    ("Libre Caslon Display", "serif", REGULAR),
    ("Yeseva One", "serif", REGULAR),
    ("Alfa Slab One", "serif", REGULAR),
    ("Patua One", "serif", REGULAR),
    // Handwriting
    ("Dancing Script", "cursive", FROM_REGULAR),
    ("Pacifico", "cursive", REGULAR),
    ("Satisfy", "cursive", REGULAR),
    ("Great Vibes", "cursive", REGULAR),
    ("Kalam", "cursive", LIGHT_REGULAR_BOLD),
    ("Permanent Marker", "cursive", REGULAR),
    ("Caveat", "cursive", FROM_REGULAR),
    ("Shadows Into Light", "cursive", REGULAR),
    ("Amatic SC", "cursive", REGULAR_BOLD),
    ("Lobster", "cursive", REGULAR),
    // Display
    ("Bangers", "sans-serif", REGULAR),
    ("Fredoka One", "sans-serif", REGULAR),
    ("Righteous", "sans-serif", REGULAR),
    ("Bebas Neue", "sans-serif", REGULAR),
    ("Anton", "sans-serif", REGULAR),
    ("Fjalla One", "sans-serif", REGULAR),
    ("Archivo Black", "sans-serif", REGULAR),
    ("Black Ops One", "sans-serif", REGULAR),
    ("Orbitron", "sans-serif", FROM_REGULAR),
    ("Rajdhani", "sans-serif", FULL),
    ("Exo 2", "sans-serif", FULL),
    ("Teko", "sans-serif", FULL),
    ("Russo One", "sans-serif", REGULAR),
    ("Bungee", "sans-serif", REGULAR),
    ("Fugaz One", "sans-serif", REGULAR),
    ("Luckiest Guy", "sans-serif", REGULAR),
    ("Passion One", "sans-serif", REGULAR_BOLD),
    ("Staatliches", "sans-serif", REGULAR),
    ("Titan One", "sans-serif", REGULAR),
    // Monospace
    ("Fira Code", "monospace", FULL),
    ("JetBrains Mono", "monospace", FULL),
    ("Source Code Pro", "monospace", FULL),
    ("Roboto Mono", "monospace", FULL),
    ("Space Mono", "monospace", REGULAR_BOLD),
    ("Courier Prime", "monospace", REGULAR_BOLD),
    ("Inconsolata", "monospace", FULL),
    ("PT Mono", "monospace", REGULAR),
    ("Overpass Mono", "monospace", FULL),
    ("Anonymous Pro", "monospace", REGULAR_BOLD),
];

struct Catalog {
    faces: Vec<FontFace>,
    by_name: HashMap<String, usize>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let mut faces = Vec::with_capacity(SYSTEM_FONTS.len() + HOSTED_FONTS.len());
    for &(name, stack) in SYSTEM_FONTS {
        faces.push(FontFace {
            name,
            stack: stack.to_string(),
            weights: &[],
        });
    }
    for &(name, generic, weights) in HOSTED_FONTS {
        // Multi-word family names must be quoted in CSS.
        let family = if name.contains(' ') {
            format!("\"{name}\"")
        } else {
            name.to_string()
        };
        faces.push(FontFace {
            name,
            stack: format!("{family}, {generic}"),
            weights,
        });
    }
    let by_name = faces
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name.to_ascii_lowercase(), i))
        .collect();
    Catalog { faces, by_name }
});

/// All catalog entries, system stacks first.
pub fn font_catalog() -> &'static [FontFace] {
    &CATALOG.faces
}

/// Look up a catalog entry by name (case-insensitive).
pub fn lookup_font(name: &str) -> Option<&'static FontFace> {
    CATALOG
        .by_name
        .get(&name.trim().to_ascii_lowercase())
        .map(|&i| &CATALOG.faces[i])
}

/// Resolve a family name to its CSS `font-family` value. Unknown names
/// resolve to the [`DEFAULT_FONT`] stack.
pub fn resolve_font_family(name: &str) -> &'static str {
    lookup_font(name)
        .map(|f| f.stack.as_str())
        .unwrap_or(DEFAULT_FONT_STACK)
}

/// Google Fonts css2 family spec for a family name, or `None` when the
/// family is a system stack or unknown.
pub fn google_font_spec(name: &str) -> Option<String> {
    lookup_font(name).and_then(FontFace::google_spec)
}

/// Build a single `@import` rule covering every hosted family in `names`.
///
/// Families are deduplicated in first-seen order. Returns an empty string
/// when none of the names needs a web-font import.
pub fn google_fonts_import<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut specs: Vec<String> = Vec::new();
    for name in names {
        if let Some(spec) = google_font_spec(name) {
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
    }
    if specs.is_empty() {
        return String::new();
    }
    let families: Vec<String> = specs.iter().map(|s| format!("family={s}")).collect();
    format!(
        "@import url(\"{GOOGLE_FONTS_CSS2}?{}&display=swap\");\n",
        families.join("&")
    )
}

/// Map a CSS `font-family` value back to a catalog name.
///
/// Tries, in order: an exact stack match, the first family in the list
/// against catalog names, then loose generic-family heuristics.
pub fn family_from_css(value: &str) -> Option<&'static str> {
    let normalized = value.trim().trim_end_matches(';').trim();
    if normalized.is_empty() {
        return None;
    }
    if let Some(face) = CATALOG
        .faces
        .iter()
        .find(|f| f.stack.eq_ignore_ascii_case(normalized))
    {
        return Some(face.name);
    }

    let first = normalized
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    if let Some(face) = lookup_font(first) {
        if !face.is_system() {
            return Some(face.name);
        }
    }

    let lower = normalized.to_ascii_lowercase();
    if lower.contains("system-ui") {
        Some("Default")
    } else if lower.contains("georgia") || (lower.contains("serif") && !lower.contains("sans-serif"))
    {
        Some("Serif")
    } else if lower.contains("mono") {
        Some("Mono")
    } else if lower.contains("sans") {
        Some("Sans")
    } else {
        None
    }
}
