//! Palette and class rules for the server-rendered markup.
//!
//! Class names are stable so the browser bundle can take over the same
//! elements during hydration.

pub const CLASS_APP_BAR: &str = "user-page-root";
pub const CLASS_CARD: &str = "user-page-card";
pub const CLASS_NAME: &str = "user-page-name";
pub const CLASS_GENDER: &str = "user-page-gender";

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: String,
    pub primary_contrast: String,
    pub secondary: String,
    pub secondary_contrast: String,
    pub card_background: String,
    pub accent: String,
    /// Upper bound of the `xs` breakpoint, in px.
    pub xs_max_width: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#3f51b5".to_string(),
            primary_contrast: "#fff".to_string(),
            secondary: "#f50057".to_string(),
            secondary_contrast: "#fff".to_string(),
            card_background: "#fff".to_string(),
            // orange[200]
            accent: "#ffcc80".to_string(),
            xs_max_width: 599.95,
        }
    }
}

impl Theme {
    pub fn css(&self) -> String {
        format!(
            "body{{margin:0;font-family:\"Roboto\",\"Helvetica\",\"Arial\",sans-serif;}}\
.app-bar{{background-color:{primary};color:{primary_contrast};}}\
.{app_bar}{{display:flex;align-items:center;padding:0 24px;font-style:italic;font-size:21px;min-height:64px;}}\
@media (max-width:{xs}px){{.{app_bar}{{font-style:normal;}}}}\
.card{{margin-top:10px;box-shadow:0 1px 3px rgba(0,0,0,0.2);border-radius:4px;overflow:hidden;}}\
.{card}{{background:{card_bg};padding:16px;}}\
.avatar{{width:40px;height:40px;border-radius:50%;}}\
.avatar-fallback{{display:flex;align-items:center;justify-content:center;background-color:#bdbdbd;color:#fafafa;}}\
.{name}{{margin:10px;color:{primary};}}\
.{gender}{{margin:10px;color:{secondary};}}\
.button-secondary{{background-color:{secondary};color:{secondary_contrast};border:0;border-radius:4px;padding:6px 16px;}}\
.email-icon{{margin-right:5px;color:{accent};}}",
            primary = self.primary,
            primary_contrast = self.primary_contrast,
            secondary = self.secondary,
            secondary_contrast = self.secondary_contrast,
            card_bg = self.card_background,
            accent = self.accent,
            xs = self.xs_max_width,
            app_bar = CLASS_APP_BAR,
            card = CLASS_CARD,
            name = CLASS_NAME,
            gender = CLASS_GENDER,
        )
    }
}
