//! Script builders for in-page interaction.
//!
//! Every script resolves its target from a serde-encoded locator literal and
//! returns a `{ status: ... }` object the Rust side matches on. XPath and
//! CSS share one resolver so the rest of the adapter is strategy-agnostic.

use siteflow_core_types::{Locator, LocatorStrategy};

/// Attribute used to bridge XPath targets into CSS-only CDP commands.
pub const MARKER_ATTR: &str = "data-siteflow-target";

const RESOLVE: &str = "const resolve = (strategy, value) => {\n        if (strategy === 'xpath') {\n            return document.evaluate(value, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\n        }\n        return document.querySelector(value);\n    };";

fn strategy_tag(locator: &Locator) -> &'static str {
    match locator.strategy {
        LocatorStrategy::Css => "css",
        LocatorStrategy::XPath => "xpath",
    }
}

fn encode(raw: &str) -> String {
    serde_json::to_string(raw).unwrap_or_else(|_| String::from("\"\""))
}

fn resolved(locator: &Locator, body: &str) -> String {
    format!(
        "(() => {{\n    {resolve}\n    const el = resolve('{strategy}', {value});\n    if (!el) {{ return {{ status: 'missing' }}; }}\n    {body}\n}})()",
        resolve = RESOLVE,
        strategy = strategy_tag(locator),
        value = encode(&locator.value),
        body = body,
    )
}

pub fn visibility_script(locator: &Locator) -> String {
    resolved(
        locator,
        "const style = window.getComputedStyle(el);\n    const rect = el.getBoundingClientRect();\n    const visible = style.visibility !== 'hidden' && style.display !== 'none' && (rect.width > 0 || rect.height > 0 || el.getClientRects().length > 0);\n    return { status: 'ok', visible };",
    )
}

pub fn click_script(locator: &Locator) -> String {
    resolved(
        locator,
        "if (typeof el.scrollIntoView === 'function') {\n        el.scrollIntoView({ block: 'center', inline: 'nearest' });\n    }\n    el.click();\n    return { status: 'ok' };",
    )
}

pub fn fill_script(locator: &Locator, text: &str) -> String {
    let body = format!(
        "el.focus();\n    el.value = {text};\n    el.dispatchEvent(new Event('input', {{ bubbles: true }}));\n    el.dispatchEvent(new Event('change', {{ bubbles: true }}));\n    return {{ status: 'ok' }};",
        text = encode(text),
    );
    resolved(locator, &body)
}

pub fn select_script(locator: &Locator, value: &str) -> String {
    let body = format!(
        "const tag = (el.tagName || '').toLowerCase();\n    if (tag !== 'select') {{ return {{ status: 'not-select' }}; }}\n    const options = Array.from(el.options || []);\n    const match = options.find(opt => (opt.value ?? '') === {value});\n    if (!match) {{ return {{ status: 'option-missing' }}; }}\n    el.value = match.value;\n    el.dispatchEvent(new Event('change', {{ bubbles: true }}));\n    return {{ status: 'ok' }};",
        value = encode(value),
    );
    resolved(locator, &body)
}

pub fn mark_script(locator: &Locator, token: &str) -> String {
    let body = format!(
        "el.setAttribute('{attr}', {token});\n    return {{ status: 'ok' }};",
        attr = MARKER_ATTR,
        token = encode(token),
    );
    resolved(locator, &body)
}

pub fn unmark_script(locator: &Locator) -> String {
    let body = format!(
        "el.removeAttribute('{attr}');\n    return {{ status: 'ok' }};",
        attr = MARKER_ATTR,
    );
    resolved(locator, &body)
}

pub fn ready_state_script() -> String {
    String::from("document.readyState")
}

pub fn scroll_position_script() -> String {
    String::from("Math.floor(window.scrollY || 0)")
}

pub fn set_scroll_script(y: i64) -> String {
    format!(
        "(() => {{ window.scrollTo({{ left: window.scrollX || 0, top: {y}, behavior: 'auto' }}); return true; }})()"
    )
}

pub fn content_height_script() -> String {
    String::from(
        "(() => {\n    const scroller = document.scrollingElement || document.documentElement || document.body;\n    return Math.floor(scroller.scrollHeight || 0);\n})()",
    )
}

pub fn viewport_height_script() -> String {
    String::from("Math.floor(window.innerHeight || 0)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_embed_encoded_locators() {
        let locator = Locator::css("input[name=\"email\"]");
        let script = visibility_script(&locator);
        assert!(script.contains("resolve('css', \"input[name=\\\"email\\\"]\")"));
        assert!(script.contains("status: 'ok'"));
    }

    #[test]
    fn xpath_locators_use_the_xpath_branch() {
        let locator = Locator::xpath("//*[@id=\"navbarNav\"]/ul/li[4]/a");
        let script = click_script(&locator);
        assert!(script.contains("resolve('xpath'"));
        assert!(script.contains("document.evaluate"));
    }

    #[test]
    fn values_are_json_escaped() {
        let locator = Locator::css("#msg");
        let script = fill_script(&locator, "line1\nline2 \"quoted\"");
        assert!(script.contains("\\n"));
        assert!(script.contains("\\\"quoted\\\""));
    }
}
