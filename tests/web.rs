#![cfg(target_arch = "wasm32")]

use tv_static_wasm::mount;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn host(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    el.set_id(id);
    document.body().unwrap().append_child(&el).unwrap();
    el
}

fn count(host: &web_sys::Element, selector: &str) -> u32 {
    host.query_selector_all(selector).unwrap().length()
}

#[wasm_bindgen_test]
fn full_page_builds_every_panel() {
    let host = host("web-full");
    let page = mount("web-full", None).unwrap();
    assert!(page.is_mounted());
    for selector in [
        ".tv-static-inner",
        ".all-controls",
        ".concentric-stretch-container",
        ".concentric-boing-container",
        ".new-feature-container",
        ".tv-static-large",
        "[data-action=toggle-rotation]",
        "[data-action=toggle-shape]",
    ] {
        assert_eq!(count(&host, selector), 1, "{selector}");
    }
    assert_eq!(count(&host, ".concentric-square"), 20);
    assert_eq!(count(&host, ".pattern-svg rect"), 40);
}

#[wasm_bindgen_test]
fn basic_preset_omits_later_panels() {
    let host = host("web-basic");
    let _page = mount("web-basic", Some("basic".into())).unwrap();
    assert_eq!(count(&host, ".tv-static-inner"), 1);
    assert_eq!(count(&host, ".concentric-stretch-container"), 0);
    assert_eq!(count(&host, ".tv-static-large"), 0);
    assert_eq!(count(&host, "[data-action=toggle-rotation]"), 0);
}

#[wasm_bindgen_test]
fn unknown_config_field_is_rejected() {
    host("web-bad");
    assert!(mount("web-bad", Some(r#"{"lasers": true}"#.into())).is_err());
    assert!(mount("no-such-host", None).is_err());
}

#[wasm_bindgen_test]
fn clicking_controls_updates_the_page() {
    let host = host("web-click");
    let page = mount("web-click", None).unwrap();

    let add = host
        .query_selector("[data-action=add-color]")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    add.click();
    assert_eq!(page.color_count(), 5);
    assert_eq!(count(&host, "input[data-action=color]"), 5);

    let circles = host
        .query_selector("[data-action=toggle-shape]")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    circles.click();
    assert_eq!(count(&host, ".pattern-svg ellipse"), 40);
    assert_eq!(count(&host, ".pattern-svg rect"), 0);
}

#[wasm_bindgen_test]
fn color_list_never_drops_below_two() {
    let host = host("web-remove");
    let page = mount("web-remove", None).unwrap();
    assert!(page.apply("remove-color", Some("0".into()), ""));
    assert!(page.apply("remove-color", Some("0".into()), ""));
    assert!(!page.apply("remove-color", Some("0".into()), ""));
    assert_eq!(page.color_count(), 2);
    assert_eq!(count(&host, "[data-action=remove-color]"), 0);
}

#[wasm_bindgen_test]
fn pace_and_pause_reach_the_static_layer() {
    let host = host("web-pace");
    let page = mount("web-pace", None).unwrap();
    assert!(page.apply("pace", None, "0"));
    assert!(page.apply("toggle-pause", None, ""));

    let inner = host
        .query_selector(".tv-static-inner")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    let style = inner.style();
    assert_eq!(style.get_property_value("animation-duration").unwrap(), "5s");
    assert_eq!(style.get_property_value("animation-play-state").unwrap(), "paused");
}

#[wasm_bindgen_test]
fn unmount_removes_the_tree() {
    let host = host("web-unmount");
    let mut page = mount("web-unmount", None).unwrap();
    assert_eq!(host.child_element_count(), 1);
    page.unmount();
    assert!(!page.is_mounted());
    assert_eq!(host.child_element_count(), 0);
    assert!(!page.apply("add-color", None, ""));
}
