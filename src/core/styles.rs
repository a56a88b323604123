//! Style roles for terminal output
//!
//! Each logical role maps to an optional `colored::Color`. Colouring happens
//! only when the caller passes `enabled = true`, so there is no global state.
//!
//! ```
//! use prioflow::core::styles::StyleRole;
//! assert_eq!(StyleRole::Heading.paint("Run summary", false), "Run summary");
//! assert!(StyleRole::Heading.paint("Run summary", true).starts_with("\x1b["));
//! ```

use crate::queue::Priority;
use clap::builder::styling::AnsiColor;
use colored::Color;

// Declares the roles and their colours in one place
macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }

            pub fn ansi_code(self) -> Option<String> {
                map_color_code(self.color()?)
            }

            pub fn paint(self, text: &str, enabled: bool) -> String {
                match self.ansi_code() {
                    Some(code) if enabled => format!("\x1b[{}m{}\x1b[0m", code, text),
                    _ => text.to_string(),
                }
            }
        }
    }
}

style! {
    Heading     => Some(Color::Yellow),
    Label       => Some(Color::BrightGreen),
    Value       => None,
    Good        => Some(Color::Green),
    Warning     => Some(Color::BrightYellow),
    Bad         => Some(Color::BrightRed),
    HighClass   => Some(Color::Red),
    NormalClass => Some(Color::Cyan),
    LowClass    => Some(Color::Blue),
    Dim         => Some(Color::BrightBlack),
}

impl StyleRole {
    /// Role used to display a priority class
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::High => StyleRole::HighClass,
            Priority::Normal => StyleRole::NormalClass,
            Priority::Low => StyleRole::LowClass,
        }
    }
}

fn map_color_code(c: Color) -> Option<String> {
    use Color::*;
    let code = match c {
        Black => "30",
        Red => "31",
        Green => "32",
        Yellow => "33",
        Blue => "34",
        Magenta => "35",
        Cyan => "36",
        White => "37",
        BrightBlack => "90",
        BrightRed => "91",
        BrightGreen => "92",
        BrightYellow => "93",
        BrightBlue => "94",
        BrightMagenta => "95",
        BrightCyan => "96",
        BrightWhite => "97",
        TrueColor { r, g, b } => return Some(format!("38;2;{};{};{}", r, g, b)),
    };
    Some(code.to_string())
}

fn color_to_ansi(c: Color) -> Option<AnsiColor> {
    use AnsiColor as A;
    use Color::*;
    Some(match c {
        Black => A::Black,
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Blue => A::Blue,
        Magenta => A::Magenta,
        Cyan => A::Cyan,
        White => A::White,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        BrightYellow => A::BrightYellow,
        BrightBlue => A::BrightBlue,
        BrightMagenta => A::BrightMagenta,
        BrightCyan => A::BrightCyan,
        BrightWhite => A::BrightWhite,
        _ => return None,
    })
}

/// clap help styles derived from the same roles
pub fn palette_to_clap(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(color_to_ansi) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Heading, true))
        .usage(style(StyleRole::Heading, true))
        .literal(style(StyleRole::NormalClass, false))
        .placeholder(style(StyleRole::Good, false))
        .valid(style(StyleRole::Good, false))
        .invalid(style(StyleRole::Bad, false))
        .error(style(StyleRole::Bad, true))
}
