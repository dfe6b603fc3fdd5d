use crate::application::service::InitialState;
use crate::domain::user::UserView;
use crate::presentation::assets::AssetManifest;
use crate::presentation::theme::{CLASS_APP_BAR, CLASS_CARD, CLASS_GENDER, CLASS_NAME, Theme};
use anyhow::Result;

/// Head entries a view contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadTags {
    pub title: &'static str,
    pub description: Option<&'static str>,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes the state for inline `<script>` use: the characters that
/// could close the element or break JS parsing are unicode-escaped.
pub fn state_json(state: &InitialState) -> Result<String> {
    let json = serde_json::to_string(state)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn render_avatar(thumbnail: Option<&str>) -> String {
    match thumbnail {
        Some(src) => format!("<img class=\"avatar\" src=\"{}\" alt=\"\">", escape_html(src)),
        // No empty src: browsers would re-request the page itself.
        None => "<div class=\"avatar avatar-fallback\" aria-hidden=\"true\">&#128100;</div>".to_string(),
    }
}

fn render_user_card(out: &mut String, user: &UserView) {
    out.push_str(&format!(
        "<div class=\"card\">\
<div class=\"{card}\">\
{avatar}\
<p class=\"{name_class}\">名前:{first} {last}</p>\
<p class=\"{gender_class}\">性別:{gender}</p>\
<div style=\"text-align:right\">\
<button type=\"button\" class=\"button-secondary\"><span class=\"email-icon\">&#9993;</span>Email</button>\
</div>\
</div>\
</div>",
        card = CLASS_CARD,
        avatar = render_avatar(user.picture.thumbnail.as_deref()),
        name_class = CLASS_NAME,
        first = escape_html(&user.name.first),
        last = escape_html(&user.name.last),
        gender_class = CLASS_GENDER,
        gender = user.gender.label(),
    ));
}

/// Markup of the user page. Both dialogs start closed, so they render
/// nothing here.
pub fn render_user_page(users: &[UserView]) -> (HeadTags, String) {
    let mut body = format!(
        "<header class=\"app-bar\"><div class=\"{}\">タイトル</div></header>",
        CLASS_APP_BAR
    );
    for user in users {
        render_user_card(&mut body, user);
    }
    body.push_str("<a style=\"display:block;margin-top:30px\" href=\"/hoge\">存在しないページ</a>");
    (
        HeadTags {
            title: "ユーザページ",
            description: Some("ユーザページのdescriptionです"),
        },
        body,
    )
}

pub fn render_not_found(path: &str) -> (HeadTags, String) {
    let body = format!(
        "<header class=\"app-bar\"><div class=\"{}\">タイトル</div></header>\
<p>{} は存在しません</p>\
<a style=\"display:block;margin-top:30px\" href=\"/\">トップへ戻る</a>",
        CLASS_APP_BAR,
        escape_html(path)
    );
    (
        HeadTags {
            title: "ページが見つかりません",
            description: None,
        },
        body,
    )
}

/// Picks the view for `path`, mirroring the client-side router.
pub fn render_view(path: &str, state: &InitialState) -> (HeadTags, String) {
    match path {
        "/" => {
            let users = state
                .user
                .as_ref()
                .map(|s| s.users.as_slice())
                .unwrap_or_default();
            render_user_page(users)
        }
        other => render_not_found(other),
    }
}

pub fn render_document(
    path: &str,
    state: &InitialState,
    assets: &AssetManifest,
    theme: &Theme,
) -> Result<String> {
    let (head, view) = render_view(path, state);
    let description = head
        .description
        .map(|d| format!("<meta name=\"description\" content=\"{}\">", escape_html(d)))
        .unwrap_or_default();

    Ok(format!(
        "<!DOCTYPE html>
<html lang='ja'>
<head>
<meta charset='utf-8' />
<meta name='viewport' content='width=device-width, initial-scale=1' />
{links}
{styles}
<title>{title}</title>{description}
<style id='jss-server-side'>{css}</style>
</head>
<body>
  <div id=\"root\">{view}</div>
  <script id=\"initial-data\">window.__STATE__={state}</script>
  {scripts}
</body>
</html>",
        links = assets.link_tags(),
        styles = assets.style_tags(),
        title = escape_html(head.title),
        description = description,
        css = theme.css(),
        view = view,
        state = state_json(state)?,
        scripts = assets.script_tags(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::service::UserState;
    use crate::domain::user::{Gender, Picture, UserName};

    fn view(first: &str, gender: Gender) -> UserView {
        UserView {
            gender,
            name: UserName {
                first: first.to_string(),
                last: "Ito".to_string(),
            },
            email: format!("{}@example.com", first.to_lowercase()),
            picture: Picture {
                thumbnail: Some("https://example.com/t.jpg".to_string()),
            },
        }
    }

    fn root_state(users: Vec<UserView>) -> InitialState {
        InitialState {
            user: Some(UserState { users }),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_state_json_cannot_close_script() {
        let state = root_state(vec![view("</script><script>alert(1)//", Gender::Male)]);
        let json = state_json(&state).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("\\u003c/script\\u003e"));

        // Still valid JSON describing the same data.
        let parsed: InitialState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_user_page_renders_cards() {
        let (head, body) = render_user_page(&[view("Emi", Gender::Female), view("Sho", Gender::Male)]);
        assert_eq!(head.title, "ユーザページ");
        assert!(body.contains("名前:Emi Ito"));
        assert!(body.contains("性別:女性"));
        assert!(body.contains("名前:Sho Ito"));
        assert!(body.contains("性別:男性"));
        assert_eq!(body.matches("class=\"card\"").count(), 2);
        assert!(body.contains("href=\"/hoge\""));
    }

    #[test]
    fn test_user_names_are_escaped() {
        let (_, body) = render_user_page(&[view("<b>", Gender::Male)]);
        assert!(body.contains("名前:&lt;b&gt; Ito"));
    }

    #[test]
    fn test_avatar_image_only_with_thumbnail() {
        let mut without = view("Nao", Gender::Female);
        without.picture.thumbnail = None;
        let (_, body) = render_user_page(&[view("Emi", Gender::Female), without]);

        assert_eq!(body.matches("<img").count(), 1);
        assert!(body.contains("<img class=\"avatar\" src=\"https://example.com/t.jpg\" alt=\"\">"));
        assert!(!body.contains("src=\"\""));
        assert_eq!(body.matches("avatar-fallback").count(), 1);
    }

    #[test]
    fn test_other_paths_render_not_found_view() {
        let (head, body) = render_view("/hoge", &InitialState::default());
        assert_eq!(head.title, "ページが見つかりません");
        assert!(body.contains("/hoge"));
    }

    #[test]
    fn test_document_embeds_state_and_assets() {
        let assets = AssetManifest::parse(
            r#"{"publicPath":"/","entrypoints":{"main":{"assets":["main.js"]}}}"#,
            "main",
        )
        .unwrap();
        let html = render_document(
            "/",
            &root_state(vec![view("Emi", Gender::Female)]),
            &assets,
            &Theme::default(),
        )
        .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>ユーザページ</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"ユーザページのdescriptionです\">"));
        assert!(html.contains("<script id=\"initial-data\">window.__STATE__={\"user\":{\"users\":[{\"gender\":\"female\""));
        assert!(html.contains("<script async src=\"/main.js\"></script>"));
        assert!(html.contains("<style id='jss-server-side'>"));
    }

    #[test]
    fn test_document_for_unknown_path_has_empty_state() {
        let html = render_document(
            "/missing",
            &InitialState::default(),
            &AssetManifest::default(),
            &Theme::default(),
        )
        .unwrap();
        assert!(html.contains("window.__STATE__={}</script>"));
    }
}
