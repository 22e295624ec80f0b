//! Kiosk display output.
//!
//! [`TerminalDisplay`] draws the dashboard on a text console: location
//! header, date/time line, and one card per measurement. It redraws the
//! whole screen every tick.

use std::io::Write;

use envboard_core::display::DisplayFrame;

pub trait DisplaySink {
    fn render(&mut self, frame: &DisplayFrame) -> std::io::Result<()>;
}

/// Clear screen and move the cursor home.
const CLEAR: &str = "\x1b[2J\x1b[H";

const CARD_WIDTH: usize = 18;
const CARD_GAP: &str = "  ";
const SCREEN_WIDTH: usize = CARD_WIDTH * 3 + 4;

const CARD_LABELS: [&str; 3] = ["TEMP (C)", "HUMIDITY (%)", "PRESSURE (hPa)"];

pub struct TerminalDisplay<W> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn render(&mut self, frame: &DisplayFrame) -> std::io::Result<()> {
        let values = [&frame.temperature, &frame.humidity, &frame.pressure];
        let border = format!("+{}+", "-".repeat(CARD_WIDTH - 2));
        let inner = CARD_WIDTH - 2;
        let width = SCREEN_WIDTH;

        let mut screen = String::new();
        screen.push_str(CLEAR);
        screen.push('\n');
        screen.push_str(&format!("{:^width$}\n\n", frame.location));
        screen.push_str(&format!("{:^width$}\n\n", frame.datetime));

        let row = |cells: [String; 3]| cells.join(CARD_GAP) + "\n";
        screen.push_str(&row([border.clone(), border.clone(), border.clone()]));
        screen.push_str(&row(CARD_LABELS.map(|label| format!("|{label:^inner$}|"))));
        screen.push_str(&row(std::array::from_fn(|_| format!("|{:inner$}|", ""))));
        screen.push_str(&row(values.map(|value| format!("|{value:^inner$}|"))));
        screen.push_str(&row([border.clone(), border.clone(), border]));

        self.out.write_all(screen.as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DisplayFrame {
        DisplayFrame {
            location: "LIVINGROOM".into(),
            datetime: "2024-05-01 13:07".into(),
            temperature: "22.7".into(),
            humidity: "53.5".into(),
            pressure: "1015".into(),
        }
    }

    #[test]
    fn renders_every_field() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.render(&frame()).unwrap();
        let text = String::from_utf8(display.into_inner()).unwrap();

        assert!(text.starts_with(CLEAR));
        for needle in ["LIVINGROOM", "2024-05-01 13:07", "22.7", "53.5", "1015"] {
            assert!(text.contains(needle), "missing {needle} in\n{text}");
        }
        for label in CARD_LABELS {
            assert!(text.contains(label));
        }
    }

    #[test]
    fn cards_line_up() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.render(&frame()).unwrap();
        let text = String::from_utf8(display.into_inner()).unwrap();

        let card_rows: Vec<&str> = text.lines().filter(|l| l.starts_with(['+', '|'])).collect();
        assert_eq!(card_rows.len(), 5);
        let width = card_rows[0].chars().count();
        assert!(card_rows.iter().all(|r| r.chars().count() == width));
        assert_eq!(width, CARD_WIDTH * 3 + CARD_GAP.len() * 2);
    }

    #[test]
    fn each_render_clears_the_screen() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.render(&frame()).unwrap();
        display.render(&frame()).unwrap();
        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text.matches(CLEAR).count(), 2);
    }
}
