//! HTML serializer for a rendered page.
//!
//! Every piece of user text and every attribute value goes through
//! `escape_html`. The output is a single self-contained document.

use super::style::{BackgroundView, CardStyle, Overlay};
use super::{BlockBody, BlockView, HeaderView, PageView};
use crate::model::profile::SeoSettings;
use crate::model::theme::BackgroundTexture;
use std::borrow::Cow;
use std::fmt::Write;

const PAGE_STYLE: &str = "body{margin:0;min-height:100vh;display:flex;justify-content:center}\
.page{position:relative;width:100%;max-width:480px;padding:48px 24px 32px;box-sizing:border-box}\
.bg{position:fixed;inset:0;z-index:-2;background-size:cover;background-position:center}\
.bg-overlay{position:fixed;inset:0;z-index:-1;background:#000}\
.texture-noise{background-image:url(\"data:image/svg+xml;utf8,<svg xmlns='http://www.w3.org/2000/svg' width='120' height='120'><filter id='n'><feTurbulence baseFrequency='0.8'/></filter><rect width='100%' height='100%' filter='url(%23n)' opacity='0.08'/></svg>\")}\
.texture-dots{background-image:radial-gradient(#d4d4d4 1px,transparent 1px);background-size:16px 16px}\
.header{display:flex;flex-direction:column;align-items:center;text-align:center;margin-bottom:32px}\
.avatar{width:96px;height:96px;border-radius:50%;object-fit:cover}\
.blocks{display:flex;flex-direction:column;gap:12px}\
.card{display:block;padding:16px;text-decoration:none;color:inherit;overflow:hidden}\
.gallery{display:flex;gap:8px;overflow-x:auto}.gallery img{height:128px}\
.empty{text-align:center;padding:40px 0;opacity:.4;font-size:14px}\
.footer{padding:32px 0 16px;font-size:10px;color:#BDBDBD;text-align:center}\
.font-sans{font-family:system-ui,sans-serif}.font-serif{font-family:Georgia,serif}.font-mono{font-family:ui-monospace,monospace}\
@keyframes pulse-slow{50%{opacity:.75}}.animate-pulse-slow{animation:pulse-slow 3s ease-in-out infinite}\
@keyframes shake-slow{0%,100%{transform:translateX(0)}25%{transform:translateX(-2px)}75%{transform:translateX(2px)}}.animate-shake-slow{animation:shake-slow 2.5s ease-in-out infinite}\
@keyframes glow{50%{box-shadow:0 0 24px rgba(255,255,255,.8)}}.animate-glow{animation:glow 2s ease-in-out infinite}";

/// Escapes `&`, `<`, `>`, `"` and `'` for text and attribute positions.
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Serializes `view` to a full HTML document with SEO metadata in `<head>`.
pub fn render_html(view: &PageView, seo: &SeoSettings) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(out, "<title>{}</title>", escape_html(&seo.page_title));
    let _ = writeln!(
        out,
        "<meta name=\"description\" content=\"{}\">",
        escape_html(&seo.meta_description)
    );
    let _ = writeln!(
        out,
        "<meta property=\"og:title\" content=\"{}\">",
        escape_html(&seo.page_title)
    );
    let _ = writeln!(
        out,
        "<meta property=\"og:description\" content=\"{}\">",
        escape_html(&seo.meta_description)
    );
    let _ = writeln!(out, "<style>{PAGE_STYLE}</style>");
    out.push_str("</head>\n<body>\n");

    write_background(&mut out, &view.background);
    out.push_str("<main class=\"page\">\n");
    write_header(&mut out, &view.header);

    out.push_str("<section class=\"blocks\">\n");
    for block in &view.blocks {
        write_block(&mut out, block, view.header.body_font_class);
    }
    if let Some(message) = view.empty_message {
        let _ = writeln!(out, "<div class=\"empty\">{}</div>", escape_html(message));
    }
    out.push_str("</section>\n");

    let _ = writeln!(
        out,
        "<footer class=\"footer\">{}</footer>",
        escape_html(view.footer)
    );
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

fn write_background(out: &mut String, background: &BackgroundView) {
    match background {
        BackgroundView::Color { color, texture } => {
            let texture_class = match texture {
                BackgroundTexture::None => "",
                BackgroundTexture::Noise => " texture-noise",
                BackgroundTexture::Dots => " texture-dots",
            };
            let _ = writeln!(
                out,
                "<div class=\"bg{texture_class}\" style=\"background-color:{}\"></div>",
                escape_html(color)
            );
        }
        BackgroundView::Image { src, overlay } => {
            let _ = writeln!(
                out,
                "<div class=\"bg\" style=\"background-image:url(&quot;{}&quot;);{}\"></div>",
                escape_html(&css_url(src)),
                blur_css(overlay)
            );
            write_overlay(out, overlay);
        }
        BackgroundView::Video { src, overlay } => {
            let _ = writeln!(
                out,
                "<video class=\"bg\" src=\"{}\" autoplay muted loop playsinline style=\"object-fit:cover;width:100%;height:100%;{}\"></video>",
                escape_html(src),
                blur_css(overlay)
            );
            write_overlay(out, overlay);
        }
        BackgroundView::Gradient { css, overlay } => {
            let _ = writeln!(
                out,
                "<div class=\"bg\" style=\"background:{};{}\"></div>",
                escape_html(css),
                blur_css(overlay)
            );
            write_overlay(out, overlay);
        }
    }
}

fn blur_css(overlay: &Overlay) -> String {
    if overlay.blur_px == 0 {
        String::new()
    } else {
        format!("filter:blur({}px);", overlay.blur_px)
    }
}

fn write_overlay(out: &mut String, overlay: &Overlay) {
    let _ = writeln!(
        out,
        "<div class=\"bg-overlay\" style=\"opacity:{}\"></div>",
        overlay.dim_opacity
    );
}

fn css_url(src: &str) -> String {
    src.replace(['"', '\\', '\n', '\r'], "")
}

fn write_header(out: &mut String, header: &HeaderView) {
    out.push_str("<header class=\"header\">\n");
    let _ = writeln!(
        out,
        "<img class=\"avatar\" src=\"{}\" alt=\"Profile\">",
        escape_html(&header.avatar_url)
    );
    let _ = writeln!(
        out,
        "<h1 class=\"{}\">{}</h1>",
        header.header_font_class,
        escape_html(&header.display_name)
    );
    let _ = writeln!(
        out,
        "<p class=\"{}\">{}</p>",
        header.body_font_class,
        escape_html(&header.bio)
    );
    out.push_str("</header>\n");
}

fn block_attrs(block: &BlockView, extra_class: &str) -> String {
    let mut class = String::from(extra_class);
    if let Some(animation) = block.animation_class {
        class.push(' ');
        class.push_str(animation);
    }
    let style = block.card.as_ref().map(CardStyle::to_css).unwrap_or_default();
    format!(
        "data-block-id=\"{}\" class=\"{}\" style=\"{}\"",
        escape_html(&block.id),
        class.trim(),
        escape_html(&style)
    )
}

fn write_block(out: &mut String, block: &BlockView, font_class: &str) {
    match &block.body {
        BlockBody::Link { href, icon, title } => {
            let _ = writeln!(
                out,
                "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\" {}><span data-icon=\"{}\"></span> <span class=\"{font_class}\">{}</span></a>",
                escape_html(href),
                block_attrs(block, "card"),
                escape_html(icon),
                escape_html(title)
            );
        }
        BlockBody::Countdown { title, days_left } => {
            let _ = writeln!(
                out,
                "<div {}><small>{}</small><div><strong>{days_left}</strong> DAYS LEFT</div></div>",
                block_attrs(block, "card"),
                escape_html(title)
            );
        }
        BlockBody::Poll {
            question,
            option_a,
            option_b,
        } => {
            let _ = writeln!(
                out,
                "<div {}><p class=\"{font_class}\">{}</p><button>{}</button> <button>{}</button></div>",
                block_attrs(block, "card"),
                escape_html(question),
                escape_html(option_a),
                escape_html(option_b)
            );
        }
        BlockBody::Tip { headline, .. } => {
            let _ = writeln!(
                out,
                "<div {}><span>{}</span> <button>Tip</button></div>",
                block_attrs(block, "card"),
                escape_html(headline)
            );
        }
        BlockBody::Image { src, alt, caption } => {
            let _ = write!(
                out,
                "<figure {}><img src=\"{}\" alt=\"{}\" style=\"width:100%;display:block\">",
                block_attrs(block, "card"),
                escape_html(src),
                escape_html(alt)
            );
            if let Some(caption) = caption {
                let _ = write!(out, "<figcaption>{}</figcaption>", escape_html(caption));
            }
            out.push_str("</figure>\n");
        }
        BlockBody::Gallery { images, radius_px } => {
            let _ = write!(out, "<div {}>", block_attrs(block, "gallery"));
            for image in images {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"\" style=\"border-radius:{radius_px}px\">",
                    escape_html(image)
                );
            }
            out.push_str("</div>\n");
        }
        BlockBody::Copy {
            label,
            content,
            success_message,
        } => {
            let _ = writeln!(
                out,
                "<button {} data-copy=\"{}\" data-copied=\"{}\"><span class=\"{font_class}\">{}</span> <code>{}</code></button>",
                block_attrs(block, "card"),
                escape_html(content),
                escape_html(success_message),
                escape_html(label),
                escape_html(content)
            );
        }
        BlockBody::ContactCard {
            button_label,
            vcard,
            file_name,
        } => {
            let href = format!("data:text/vcard;charset=utf-8,{}", percent_encode(vcard));
            let _ = writeln!(
                out,
                "<a href=\"{}\" download=\"{}\" {}>{}</a>",
                escape_html(&href),
                escape_html(file_name),
                block_attrs(block, "card"),
                escape_html(button_label)
            );
        }
    }
}

fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}
