//! Built-in formatter set
//!
//! Covers every standard color and text effect. Applications that need more can
//! start from [`builtin_builder`] and add their own before freezing.

use crate::core::markup::{Color, FormatterRegistry, FormatterRegistryBuilder, Style};

const COLORS: [(&str, Color); 16] = [
    ("black", Color::Black),
    ("dark_blue", Color::DarkBlue),
    ("dark_green", Color::DarkGreen),
    ("dark_aqua", Color::DarkAqua),
    ("dark_red", Color::DarkRed),
    ("dark_purple", Color::DarkPurple),
    ("gold", Color::Gold),
    ("gray", Color::Gray),
    ("dark_gray", Color::DarkGray),
    ("blue", Color::Blue),
    ("green", Color::Green),
    ("aqua", Color::Aqua),
    ("red", Color::Red),
    ("light_purple", Color::LightPurple),
    ("yellow", Color::Yellow),
    ("white", Color::White),
];

/// Builder pre-filled with the built-in formatters
pub fn builtin_builder() -> FormatterRegistryBuilder {
    let mut builder = FormatterRegistryBuilder::new()
        .formatter("reset", |style: &mut Style| {
            *style = Style {
                color: Some(Color::White),
                ..Style::default()
            };
        })
        .formatter("url", |style: &mut Style| {
            style.color = Some(Color::Blue);
            style.bold = true;
            style.underlined = true;
        })
        .formatter("bold", |style: &mut Style| style.bold = true)
        .formatter("italicize", |style: &mut Style| style.italic = true)
        .formatter("underline", |style: &mut Style| style.underlined = true)
        .formatter("strikethrough", |style: &mut Style| style.strikethrough = true)
        .formatter("obfuscate", |style: &mut Style| style.obfuscated = true);

    for (name, color) in COLORS {
        builder = builder.formatter(name, move |style: &mut Style| style.color = Some(color));
    }

    builder
}

/// Frozen registry holding only the built-in formatters
pub fn builtin() -> FormatterRegistry {
    builtin_builder().build()
}
