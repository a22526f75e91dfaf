use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

pub const BG_DEEP: Color32 = Color32::from_rgb(4, 6, 8);
pub const BG_PANEL: Color32 = Color32::from_rgb(10, 12, 16);
pub const BG_WIDGET: Color32 = Color32::from_rgb(20, 24, 30);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(30, 36, 46);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(40, 48, 62);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(176, 182, 190);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(110, 116, 126);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(226, 230, 236);

pub const ACCENT_CYAN: Color32 = Color32::from_rgb(38, 186, 200);
pub const ACCENT_AMBER: Color32 = Color32::from_rgb(214, 162, 46);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(64, 176, 90);
pub const ACCENT_RED: Color32 = Color32::from_rgb(196, 58, 48);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(40, 70, 86, 90);

fn widget(bg: Color32, stroke: Stroke, fg: Color32, expansion: f32) -> egui::style::WidgetVisuals {
    egui::style::WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: stroke,
        rounding: Rounding::same(4.0),
        fg_stroke: Stroke::new(1.0, fg),
        expansion,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.widgets.noninteractive = widget(BG_WIDGET, Stroke::new(1.0, BORDER_SUBTLE), TEXT_MUTED, 0.0);
    visuals.widgets.noninteractive.weak_bg_fill = BG_PANEL;
    visuals.widgets.inactive = widget(BG_WIDGET, Stroke::new(1.0, BORDER_SUBTLE), TEXT_PRIMARY, 0.0);
    visuals.widgets.hovered = widget(BG_WIDGET_HOVER, Stroke::new(1.0, ACCENT_CYAN), TEXT_BRIGHT, 1.0);
    visuals.widgets.active = widget(BG_WIDGET_ACTIVE, Stroke::new(2.0, ACCENT_CYAN), TEXT_BRIGHT, 1.0);
    visuals.widgets.open = widget(BG_WIDGET_ACTIVE, Stroke::new(1.0, ACCENT_CYAN), TEXT_BRIGHT, 0.0);
    visuals.selection = egui::style::Selection {
        bg_fill: ACCENT_CYAN.gamma_multiply(0.35),
        stroke: Stroke::new(1.0, ACCENT_CYAN),
    };
    visuals.hyperlink_color = ACCENT_CYAN;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_DEEP;
    visuals.warn_fg_color = ACCENT_AMBER;
    visuals.error_fg_color = ACCENT_RED;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.panel_fill = BG_PANEL;
    visuals.slider_trailing_fill = true;
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.slider_width = 190.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
