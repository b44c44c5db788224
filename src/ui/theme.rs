use crate::config::ThemeChoice;
use ratatui::style::Color;

/// Colors used by the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name ("dark" or "light")
    pub name: &'static str,

    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub border_fg: Color,
    pub focused_border_fg: Color,

    // Tree rows
    pub directory_fg: Color,
    pub file_fg: Color,
    pub indicator_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub match_fg: Color,

    pub header_title_fg: Color,
    pub link_fg: Color,
    pub status_bar_fg: Color,
    pub status_bar_bg: Color,
    pub notice_fg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Default dark theme
    pub fn dark() -> Self {
        Self {
            name: "dark",

            bg: Color::Rgb(17, 24, 39),
            fg: Color::Rgb(229, 231, 235),
            muted_fg: Color::Rgb(156, 163, 175),
            border_fg: Color::Rgb(75, 85, 99),
            focused_border_fg: Color::Cyan,

            directory_fg: Color::Rgb(147, 197, 253),
            file_fg: Color::Rgb(229, 231, 235),
            indicator_fg: Color::Yellow,
            selection_bg: Color::Rgb(55, 65, 81),
            selection_fg: Color::White,
            match_fg: Color::Rgb(250, 204, 21),

            header_title_fg: Color::White,
            link_fg: Color::Rgb(96, 165, 250),
            status_bar_fg: Color::Rgb(209, 213, 219),
            status_bar_bg: Color::Rgb(31, 41, 55),
            notice_fg: Color::Rgb(134, 239, 172),
            error_fg: Color::Rgb(248, 113, 113),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light",

            bg: Color::Rgb(249, 250, 251),
            fg: Color::Rgb(31, 41, 55),
            muted_fg: Color::Rgb(107, 114, 128),
            border_fg: Color::Rgb(209, 213, 219),
            focused_border_fg: Color::Blue,

            directory_fg: Color::Rgb(29, 78, 216),
            file_fg: Color::Rgb(31, 41, 55),
            indicator_fg: Color::Rgb(180, 83, 9),
            selection_bg: Color::Rgb(229, 231, 235),
            selection_fg: Color::Black,
            match_fg: Color::Rgb(161, 98, 7),

            header_title_fg: Color::Black,
            link_fg: Color::Rgb(37, 99, 235),
            status_bar_fg: Color::Rgb(55, 65, 81),
            status_bar_bg: Color::Rgb(243, 244, 246),
            notice_fg: Color::Rgb(21, 128, 61),
            error_fg: Color::Rgb(185, 28, 28),
        }
    }

    /// Theme for a configured choice
    ///
    /// `Auto` follows the terminal background hint in `COLORFGBG`, defaulting
    /// to dark. A transparent theme paints no backgrounds of its own.
    pub fn resolve(choice: ThemeChoice, transparent: bool) -> Self {
        let use_light = match choice {
            ThemeChoice::Dark => false,
            ThemeChoice::Light => true,
            ThemeChoice::Auto => {
                !transparent && terminal_prefers_light(std::env::var("COLORFGBG").ok().as_deref())
            }
        };
        let theme = if use_light { Self::light() } else { Self::dark() };
        if transparent {
            theme.transparent()
        } else {
            theme
        }
    }

    /// Same colors with the backgrounds removed
    pub fn transparent(mut self) -> Self {
        self.bg = Color::Reset;
        self.status_bar_bg = Color::Reset;
        self
    }
}

/// Interpret `COLORFGBG` ("fg;bg"): light when the background is 7 or 15
fn terminal_prefers_light(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg == 7 || bg == 15)
}
