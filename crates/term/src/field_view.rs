//! FieldView: maps a card field `InputState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{display_len, is_complete, luhn_valid, masked, CardFormatter, InputState};
use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// One network badge in the icon row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIcon {
    pub name: String,
    pub enabled: bool,
}

/// Icon state for the active network.
///
/// While no network is detected every icon is lit; once one is detected only
/// its icon stays lit.
pub fn network_icons(formatter: &CardFormatter, active: &str) -> Vec<NetworkIcon> {
    let table = formatter.table();
    let fallback = table.fallback().name == active;
    table
        .rules()
        .iter()
        .map(|rule| NetworkIcon {
            name: rule.name.clone(),
            enabled: fallback || rule.name == active,
        })
        .collect()
}

/// Rows of the view relative to its top edge.
const TITLE_ROW: u16 = 0;
const FIELD_ROW: u16 = 2;
const ICON_ROW: u16 = 4;
const STATUS_ROW: u16 = 6;
const MASKED_ROW: u16 = 7;
const HELP_ROW: u16 = 9;
const VIEW_HEIGHT: u16 = 10;

const TEXT_PAD: u16 = 1;

const BG: Rgb = Rgb::new(0, 0, 0);
const LABEL: CellStyle = CellStyle {
    fg: Rgb::new(220, 220, 220),
    bg: BG,
    bold: true,
    dim: false,
};
const VALUE: CellStyle = CellStyle::plain(Rgb::new(200, 200, 200), BG);
const BORDER: CellStyle = CellStyle::plain(Rgb::new(160, 160, 170), BG);
const FIELD: CellStyle = CellStyle::plain(Rgb::new(240, 240, 240), Rgb::new(30, 30, 40));
const SELECTED: CellStyle = CellStyle::plain(Rgb::new(255, 255, 255), Rgb::new(60, 90, 170));
const ICON_ON: CellStyle = CellStyle {
    fg: Rgb::new(0, 0, 0),
    bg: Rgb::new(120, 200, 140),
    bold: true,
    dim: false,
};
const ICON_OFF: CellStyle = CellStyle {
    fg: Rgb::new(110, 110, 120),
    bg: BG,
    bold: false,
    dim: true,
};
const GOOD: CellStyle = CellStyle::plain(Rgb::new(120, 220, 140), BG);
const BAD: CellStyle = CellStyle::plain(Rgb::new(230, 100, 100), BG);

/// A rendered frame plus where the caret should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub fb: FrameBuffer,
    pub caret: Option<(u16, u16)>,
}

/// A lightweight terminal renderer for one card number field.
pub struct FieldView {
    title: String,
    anchor_y: AnchorY,
}

impl Default for FieldView {
    fn default() -> Self {
        Self {
            title: "Card number".to_string(),
            anchor_y: AnchorY::Center,
        }
    }
}

impl FieldView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Inner width of the text box: wide enough for the longest complete
    /// number of any rule, and for whatever is currently typed. The caret at
    /// the end of the text sits in the right padding column.
    pub fn field_width(&self, formatter: &CardFormatter, state: &InputState) -> u16 {
        let table = formatter.table();
        let widest = table
            .rules()
            .iter()
            .chain(std::iter::once(table.fallback()))
            .map(|rule| {
                let digits = formatter
                    .digit_limit(rule)
                    .unwrap_or_else(|| rule.grouped_digits());
                display_len(digits, rule)
            })
            .max()
            .unwrap_or(0);
        let needed = widest.max(state.text.len());
        to_col(needed).saturating_add(TEXT_PAD * 2)
    }

    /// Render into an existing framebuffer and return the caret position.
    pub fn render_into(
        &self,
        formatter: &CardFormatter,
        state: &InputState,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) -> Option<(u16, u16)> {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let inner_w = self.field_width(formatter, state);
        let frame_w = inner_w.saturating_add(2);
        let x0 = viewport.width.saturating_sub(frame_w) / 2;
        let y0 = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(VIEW_HEIGHT) / 2,
            AnchorY::Top => 0,
        };

        fb.put_str(x0, y0 + TITLE_ROW, &self.title, LABEL);

        // Text box.
        let box_y = y0 + FIELD_ROW - 1;
        draw_border(fb, x0, box_y, frame_w, 3, BORDER);
        fb.fill_rect(x0 + 1, box_y + 1, inner_w, 1, ' ', FIELD);

        let text_x = x0 + 1 + TEXT_PAD;
        let sel = state.selection.clamped(state.text.len());
        for (i, ch) in state.text.chars().enumerate() {
            let style = if i >= sel.start() && i < sel.end() {
                SELECTED
            } else {
                FIELD
            };
            fb.put_char(text_x.saturating_add(to_col(i)), box_y + 1, ch, style);
        }

        let caret_x = text_x.saturating_add(to_col(sel.head));
        if !state.has_selection() {
            let ch = fb.get(caret_x, box_y + 1).map_or(' ', |cell| cell.ch);
            fb.put_char(caret_x, box_y + 1, ch, FIELD.inverted());
        }

        // Icons.
        let mut x = x0;
        for icon in network_icons(formatter, &state.network) {
            let label = format!(" {} ", icon.name.to_uppercase());
            let style = if icon.enabled { ICON_ON } else { ICON_OFF };
            x = fb.put_str(x, y0 + ICON_ROW, &label, style).saturating_add(1);
        }

        self.draw_status(formatter, state, fb, x0, y0);

        fb.put_str(
            x0,
            y0 + HELP_ROW,
            "Esc quit  Ctrl+U clear  Ctrl+A select all",
            CellStyle { dim: true, ..VALUE },
        );

        let caret = (caret_x, box_y + 1);
        (caret.0 < viewport.width && caret.1 < viewport.height).then_some(caret)
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        formatter: &CardFormatter,
        state: &InputState,
        viewport: Viewport,
    ) -> RenderedField {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        let caret = self.render_into(formatter, state, viewport, &mut fb);
        RenderedField { fb, caret }
    }

    fn draw_status(
        &self,
        formatter: &CardFormatter,
        state: &InputState,
        fb: &mut FrameBuffer,
        x0: u16,
        y0: u16,
    ) {
        let rule = formatter.active_rule(state);
        let digits = state.digits();
        let count = digits.len();

        let y = y0 + STATUS_ROW;
        let mut x = fb.put_str(x0, y, "NETWORK ", LABEL);
        x = fb.put_str(x, y, &rule.name, VALUE);
        x = fb.put_str(x.saturating_add(2), y, "DIGITS ", LABEL);
        let limit = formatter
            .digit_limit(rule)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        x = fb.put_str(x, y, &format!("{count}/{limit}"), VALUE);

        if is_complete(&digits, rule) {
            x = fb.put_str(x.saturating_add(2), y, "CHECK ", LABEL);
            if luhn_valid(&digits) {
                fb.put_str(x, y, "ok", GOOD);
            } else {
                fb.put_str(x, y, "invalid", BAD);
            }
        }

        if count > 0 {
            let y = y0 + MASKED_ROW;
            let x = fb.put_str(x0, y, "MASKED  ", LABEL);
            fb.put_str(x, y, &masked(&digits, rule), VALUE);
        }
    }
}

/// Screen column offset for a text index, pinned at the edge of the
/// addressable range.
fn to_col(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RuleTable;

    #[test]
    fn icons_all_lit_for_unknown() {
        let f = CardFormatter::new(RuleTable::builtin());
        let icons = network_icons(&f, "unknown");
        assert_eq!(icons.len(), 4);
        assert!(icons.iter().all(|i| i.enabled));
    }

    #[test]
    fn icons_single_lit_for_known() {
        let f = CardFormatter::new(RuleTable::builtin());
        let lit: Vec<_> = network_icons(&f, "amex")
            .into_iter()
            .filter(|i| i.enabled)
            .map(|i| i.name)
            .collect();
        assert_eq!(lit, vec!["amex".to_string()]);
    }

    #[test]
    fn field_width_fits_longest_rule() {
        let f = CardFormatter::new(RuleTable::builtin());
        let view = FieldView::default();
        // "4111 1111 1111 1111" is 19 wide, plus padding on both sides.
        assert_eq!(view.field_width(&f, &f.empty()), 21);

        let long = f.init("99999999999999999999999").state;
        assert_eq!(view.field_width(&f, &long), long.text.len() as u16 + 2);

        let visa = f.init("4111111111111111").state;
        assert_eq!(view.field_width(&f, &visa), 21);
    }

    #[test]
    fn field_width_saturates_for_huge_input() {
        let f = CardFormatter::new(RuleTable::builtin());
        let huge = f.init(&"9".repeat(70_000)).state;
        assert_eq!(FieldView::default().field_width(&f, &huge), u16::MAX);

        let out = FieldView::default().render(&f, &huge, Viewport::new(40, 12));
        assert_eq!(out.caret, None);
    }
}
