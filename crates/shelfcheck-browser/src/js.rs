//! Page scripts used by the catalog driver.
//!
//! Each function returns a JavaScript function expression. Arguments
//! (locators, names, values) are passed separately through
//! [`Page::evaluate_with`](crate::Page::evaluate_with), so no user text is
//! ever spliced into script source.

/// XPath helpers prepended to every script body.
const HELPERS: &str = "\
    const first = (xp, ctx) => document.evaluate(\
        xp, ctx || document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue; \
    const all = (xp, ctx) => { \
        const r = document.evaluate(xp, ctx || document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
        return Array.from({ length: r.snapshotLength }, (_, i) => r.snapshotItem(i)); \
    }; \
    const text = (el) => (el.innerText || el.textContent || '').trim(); \
    const setValue = (input, value) => { \
        input.scrollIntoView({ block: 'center' }); \
        input.focus(); \
        const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set; \
        setter.call(input, String(value)); \
        input.dispatchEvent(new Event('input', { bubbles: true })); \
        input.dispatchEvent(new Event('change', { bubbles: true })); \
    };";

fn function(params: &str, body: &str) -> String {
    format!("({params}) => {{ {HELPERS} {body} }}")
}

/// Scrolls the list one screen down; returns the number of product links.
///
/// Args: `list`, `link`, `scroller`.
pub(crate) fn scroll_product_list() -> String {
    function(
        "list, link, scroller",
        "const s = first(scroller); \
         if (s) s.scrollBy(0, s.clientHeight); \
         window.scrollBy(0, window.innerHeight); \
         const l = first(list); \
         return l ? all(link, l).length : 0;",
    )
}

/// Reads `{ title, url, priceText }` for every product link.
///
/// Args: `list`, `link`, `price`.
pub(crate) fn extract_products() -> String {
    function(
        "list, link, price",
        "const l = first(list); \
         if (!l) return []; \
         return all(link, l).map(a => { \
             const p = first(price, a); \
             return { title: text(a), url: a.href || a.getAttribute('href') || '', priceText: p ? p.textContent : '' }; \
         });",
    )
}

/// Current URL plus the first product link, to detect a page change.
///
/// Args: `list`, `link`.
pub(crate) fn listing_signature() -> String {
    function(
        "list, link",
        "const l = first(list); \
         const a = l ? first(link, l) : null; \
         return window.location.href + '|' + (a ? a.href : '');",
    )
}

/// State of the next-page control: `'missing'`, `'disabled'` or `'enabled'`.
///
/// Args: `xpath`.
pub(crate) fn next_page_state() -> String {
    function(
        "xpath",
        "const el = first(xpath); \
         if (!el) return 'missing'; \
         const disabled = el.disabled === true || el.hasAttribute('disabled') \
             || (el.getAttribute('aria-disabled') || '').toLowerCase() === 'true'; \
         return disabled ? 'disabled' : 'enabled';",
    )
}

/// Box of the product card at `index` in the list.
///
/// When the link at `index` no longer carries `title` (the list re-rendered),
/// falls back to the first link whose title equals `title`, ignoring case.
/// Returns `{ found: false }` or `{ found: true, byPosition, region }`, with
/// the region in document coordinates after scrolling the card into view.
///
/// Args: `list`, `link`, `block`, `index`, `title`.
pub(crate) fn product_region() -> String {
    function(
        "list, link, block, index, title",
        "const l = first(list); \
         const links = l ? all(link, l) : []; \
         const want = title.toLowerCase(); \
         const same = (e) => text(e).toLowerCase() === want; \
         const byPosition = !!links[index] && same(links[index]); \
         const a = byPosition ? links[index] : links.find(same); \
         if (!a) return { found: false }; \
         const card = first(block, a) || a; \
         card.scrollIntoView({ block: 'center' }); \
         const r = card.getBoundingClientRect(); \
         return { found: true, byPosition, region: { x: r.left + window.scrollX, y: r.top + window.scrollY, width: r.width, height: r.height } };",
    )
}

/// Index of the first filter block whose text contains `name`, compared
/// upper-cased; `-1` when none does.
///
/// Args: `blocks`, `name`.
pub(crate) fn locate_filter_block() -> String {
    function(
        "blocks, name",
        "const want = name.toUpperCase(); \
         return all(blocks).findIndex(b => { \
             b.scrollIntoView({ block: 'center' }); \
             return text(b).toUpperCase().includes(want); \
         });",
    )
}

/// Enters range bounds. Returns `'ok'`, `'block'` when the block is gone,
/// or `'inputs'` when the block has no range inputs.
///
/// Args: `blocks`, `index`, `min_input`, `max_input`, `min`, `max`.
pub(crate) fn set_range() -> String {
    function(
        "blocks, index, minInput, maxInput, min, max",
        "const b = all(blocks)[index]; \
         if (!b) return 'block'; \
         const lo = first(minInput, b); \
         const hi = first(maxInput, b); \
         if (!lo || !hi) return 'inputs'; \
         setValue(lo, min); \
         setValue(hi, max); \
         hi.blur(); \
         return 'ok';",
    )
}

/// Expands a collapsed value list. Returns false when the block is gone.
///
/// Args: `blocks`, `index`, `expand`.
pub(crate) fn expand_filter_block() -> String {
    function(
        "blocks, index, expand",
        "const b = all(blocks)[index]; \
         if (!b) return false; \
         const btn = first(expand, b); \
         if (btn && btn.getAttribute('aria-expanded') !== 'true') { \
             btn.scrollIntoView({ block: 'center' }); \
             btn.click(); \
         } \
         return true;",
    )
}

/// Types `value` into the block's value search input, if it has one.
/// Returns whether an input was found.
///
/// Args: `blocks`, `index`, `search`, `value`.
pub(crate) fn search_filter_values() -> String {
    function(
        "blocks, index, search, value",
        "const b = all(blocks)[index]; \
         const input = b ? first(search, b) : null; \
         if (!input) return false; \
         setValue(input, value); \
         return true;",
    )
}

/// The value label whose text equals `value` ignoring case, or `null`.
///
/// Args: `blocks`, `index`, `label`, `value`.
pub(crate) fn find_value_label() -> String {
    function(
        "blocks, index, label, value",
        "const b = all(blocks)[index]; \
         if (!b) return null; \
         const want = value.trim().toLowerCase(); \
         return all(label, b).find(l => text(l).toLowerCase() === want) || null;",
    )
}

/// The first node of `xpath` whose text equals `name` ignoring case, or `null`.
///
/// Args: `xpath`, `name`.
pub(crate) fn find_by_text() -> String {
    function(
        "xpath, name",
        "const want = name.trim().toLowerCase(); \
         return all(xpath).find(e => text(e).toLowerCase() === want) || null;",
    )
}

/// Clears an input located by an absolute XPath. Returns whether it exists.
///
/// Args: `xpath`.
pub(crate) fn clear_input() -> String {
    function(
        "xpath",
        "const input = first(xpath); \
         if (!input) return false; \
         setValue(input, ''); \
         return true;",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_arrow_functions_with_helpers() {
        for script in [
            scroll_product_list(),
            extract_products(),
            listing_signature(),
            next_page_state(),
            product_region(),
            locate_filter_block(),
            set_range(),
            expand_filter_block(),
            search_filter_values(),
            find_value_label(),
            find_by_text(),
            clear_input(),
        ] {
            assert!(script.starts_with('('), "{script}");
            assert!(script.contains(") => {"), "{script}");
            assert!(script.contains("const first ="), "{script}");
            assert!(script.ends_with('}'), "{script}");
        }
    }

    #[test]
    fn balanced_delimiters() {
        for script in [extract_products(), next_page_state(), product_region(), set_range(), find_value_label()] {
            let count = |c| script.chars().filter(|&x| x == c).count();
            assert_eq!(count('('), count(')'), "{script}");
            assert_eq!(count('{'), count('}'), "{script}");
            assert_eq!(count('['), count(']'), "{script}");
        }
    }

    #[test]
    fn scripts_take_their_parameters() {
        assert!(set_range().starts_with("(blocks, index, minInput, maxInput, min, max) =>"));
        assert!(find_value_label().starts_with("(blocks, index, label, value) =>"));
    }

    #[test]
    fn product_region_prefers_position_over_title() {
        let script = product_region();
        assert!(script.starts_with("(list, link, block, index, title) =>"));
        assert!(script.contains("links[index]"));
        assert!(script.contains("links.find(same)"));
    }
}
