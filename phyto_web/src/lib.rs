//! Browser behaviour for the phytospore project page. Everything binds to
//! markup that is already on the page; a missing element only disables the
//! feature that needs it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::*;
use phyto::decay::{compute_series, conclusion, table_rows, CalcInput, Series};
use phyto::manifest::{
    icon_links, manifest_link, HeadLink, IconAsset, ManifestConfig, WebManifest, GENERATED_ATTR,
    GENERATED_VALUE, MANIFEST_MIME,
};
use phyto::scene::{DrawOp, Path, PathCmd, Scene};
use phyto::ui::{self, Modal, NavMenu};
use phyto::{layout_chart, leaf_icon, ChartStyle, Locale, ICON_SIZES};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, Element, Event,
    EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent, NodeList,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

const YEAR_ID: &str = "year";
const NAV_TOGGLE_SELECTOR: &str = ".nav-toggle";
const NAV_ID: &str = "site-nav";
const MODAL_OPEN_ID: &str = "openScientistModal";
const MODAL_ID: &str = "scientistModal";
const FORM_ID: &str = "calcForm";
const TABLE_BODY_SELECTOR: &str = "#resultsTable tbody";
const CANVAS_ID: &str = "chartCanvas";
const CONCLUSION_ID: &str = "calcConclusion";
const V0_ID: &str = "V0";
const K_ID: &str = "K";
const N_ID: &str = "N";

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok()
    {
        // Page-lifetime listener.
        closure.forget();
    }
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn page_locale(doc: &Document) -> Locale {
    doc.document_element()
        .and_then(|root| root.get_attribute("lang"))
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}

fn stamp_year(doc: &Document) {
    if let Some(el) = doc.get_element_by_id(YEAR_ID) {
        let year = js_sys::Date::new_0().get_full_year();
        el.set_text_content(Some(&year.to_string()));
    }
}

fn bind_nav(doc: &Document) {
    let (Some(toggle), Some(nav)) = (
        doc.query_selector(NAV_TOGGLE_SELECTOR).ok().flatten(),
        doc.get_element_by_id(NAV_ID),
    ) else {
        return;
    };
    let menu = Rc::new(RefCell::new(NavMenu::from_aria_expanded(
        toggle.get_attribute("aria-expanded").as_deref(),
    )));

    let apply = {
        let toggle = toggle.clone();
        let nav = nav.clone();
        move |menu: &NavMenu| {
            toggle.set_attribute("aria-expanded", menu.aria_expanded()).ok();
            nav.class_list()
                .toggle_with_force(ui::NAV_OPEN_CLASS, menu.is_open())
                .ok();
        }
    };

    {
        let menu = menu.clone();
        let apply = apply.clone();
        listen(&toggle, "click", move |_| {
            let mut menu = menu.borrow_mut();
            menu.toggle();
            apply(&*menu);
        });
    }

    for link in elements(nav.query_selector_all("a")) {
        let menu = menu.clone();
        let apply = apply.clone();
        listen(&link, "click", move |_| {
            let mut menu = menu.borrow_mut();
            menu.close();
            apply(&*menu);
        });
    }
}

fn bind_smooth_scroll(doc: &Document, window: &Window) {
    for link in elements(doc.query_selector_all("a[href^=\"#\"]")) {
        let doc = doc.clone();
        let window = window.clone();
        let anchor = link.clone();
        listen(&link, "click", move |ev| {
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            let Some(selector) = ui::anchor_target(&href) else {
                return;
            };
            // Ids that are not valid selectors (e.g. "#1st") fall through to
            // the browser's own jump.
            let Some(target) = doc.query_selector(selector).ok().flatten() else {
                return;
            };
            ev.prevent_default();
            let opts = ScrollIntoViewOptions::new();
            opts.set_behavior(ScrollBehavior::Smooth);
            opts.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&opts);
            if let Ok(history) = window.history() {
                history
                    .push_state_with_url(&JsValue::NULL, "", Some(selector))
                    .ok();
            }
        });
    }
}

fn bind_modal(doc: &Document, window: &Window) {
    let (Some(open_btn), Some(modal_el)) = (
        doc.get_element_by_id(MODAL_OPEN_ID),
        doc.get_element_by_id(MODAL_ID),
    ) else {
        return;
    };
    let body = doc.body();
    let state = Rc::new(RefCell::new(Modal::from_aria_hidden(
        modal_el.get_attribute("aria-hidden").as_deref(),
    )));

    let apply = {
        let modal_el = modal_el.clone();
        move |modal: &Modal| {
            modal_el.set_attribute("aria-hidden", modal.aria_hidden()).ok();
            if let Some(body) = body.as_ref() {
                let style = body.style();
                if modal.body_overflow().is_empty() {
                    style.remove_property("overflow").ok();
                } else {
                    style.set_property("overflow", modal.body_overflow()).ok();
                }
            }
        }
    };

    {
        let state = state.clone();
        let apply = apply.clone();
        listen(&open_btn, "click", move |_| {
            let mut modal = state.borrow_mut();
            modal.open();
            apply(&*modal);
        });
    }

    {
        let state = state.clone();
        let apply = apply.clone();
        listen(&modal_el, "click", move |ev| {
            let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let data_close = target.get_attribute(ui::MODAL_CLOSE_ATTR);
            if ui::closes_modal(data_close.as_deref(), &target.class_name()) {
                let mut modal = state.borrow_mut();
                modal.close();
                apply(&*modal);
            }
        });
    }

    listen(window, "keydown", move |ev| {
        let Some(key) = ev.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        let mut modal = state.borrow_mut();
        if modal.on_key(&key) {
            apply(&*modal);
        }
    });
}

fn input_value(doc: &Document, id: &str) -> String {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn read_series(doc: &Document) -> Option<Series> {
    let input = CalcInput::from_fields(
        &input_value(doc, V0_ID),
        &input_value(doc, K_ID),
        &input_value(doc, N_ID),
    )
    .ok()?;
    compute_series(&input).ok()
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn trace_path(ctx: &CanvasRenderingContext2d, path: &Path) {
    ctx.begin_path();
    for cmd in &path.cmds {
        match *cmd {
            PathCmd::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathCmd::LineTo(p) => ctx.line_to(p.x, p.y),
            PathCmd::QuadTo { ctrl, to } => ctx.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y),
            PathCmd::Close => ctx.close_path(),
        }
    }
}

fn draw_scene(ctx: &CanvasRenderingContext2d, scene: &Scene) {
    let (w, h) = (scene.width as f64, scene.height as f64);
    for op in scene.ops() {
        match op {
            DrawOp::Clear { color: None } => ctx.clear_rect(0.0, 0.0, w, h),
            DrawOp::Clear { color: Some(color) } => {
                ctx.set_fill_style_str(&color.to_string());
                ctx.fill_rect(0.0, 0.0, w, h);
            }
            DrawOp::FillRect { x, y, w, h, color } => {
                ctx.set_fill_style_str(&color.to_string());
                ctx.fill_rect(*x, *y, *w, *h);
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_string());
                ctx.begin_path();
                ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU)
                    .ok();
                ctx.fill();
            }
            DrawOp::FillPath { path, color } => {
                ctx.set_fill_style_str(&color.to_string());
                trace_path(ctx, path);
                ctx.fill();
            }
            DrawOp::StrokePath { path, color, width } => {
                ctx.set_stroke_style_str(&color.to_string());
                ctx.set_line_width(*width);
                trace_path(ctx, path);
                ctx.stroke();
            }
            DrawOp::Text {
                text,
                pos,
                color,
                font,
                align,
            } => {
                ctx.set_fill_style_str(&color.to_string());
                ctx.set_font(&font.css());
                ctx.set_text_align(align.as_css());
                ctx.fill_text(text, pos.x, pos.y).ok();
            }
        }
    }
}

fn render_chart(canvas: &HtmlCanvasElement, series: &Series, style: &ChartStyle) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    if let Ok(scene) = layout_chart(&series.points, canvas.width(), canvas.height(), style) {
        draw_scene(&ctx, &scene);
    }
}

#[component]
fn ResultRows(series: ReadSignal<Option<Series>>) -> impl IntoView {
    move || {
        series.get().map(|series| {
            table_rows(&series)
                .into_iter()
                .map(|row| view! { <tr><td>{row.index}</td><td>{row.value}</td></tr> })
                .collect_view()
        })
    }
}

fn bind_calculator(doc: &Document) {
    let Some(form) = doc.get_element_by_id(FORM_ID) else {
        return;
    };
    let locale = page_locale(doc);
    let (series, set_series) = create_signal(Option::<Series>::None);

    if let Some(tbody) = doc
        .query_selector(TABLE_BODY_SELECTOR)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        tbody.set_inner_html("");
        mount_to(tbody, move || view! { <ResultRows series=series/> });
    }

    let canvas = doc
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
    let conclusion_el = doc.get_element_by_id(CONCLUSION_ID);
    let style = ChartStyle::default();
    create_effect(move |_| {
        let Some(current) = series.get() else {
            return;
        };
        if let Some(canvas) = canvas.as_ref() {
            render_chart(canvas, &current, &style);
        }
        if let Some(el) = conclusion_el.as_ref() {
            el.set_text_content(Some(&conclusion(&current, locale)));
        }
    });

    // Invalid input keeps whatever was rendered last.
    let refresh = {
        let doc = doc.clone();
        move || {
            if let Some(next) = read_series(&doc) {
                set_series.set(Some(next));
            }
        }
    };

    refresh();
    listen(&form, "submit", move |ev| {
        ev.prevent_default();
        refresh();
    });
}

fn icon_data_url(doc: &Document, size: u32) -> Option<String> {
    let canvas = doc
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas.set_width(size);
    canvas.set_height(size);
    let ctx = context_2d(&canvas)?;
    let scene = leaf_icon(size, size).ok()?;
    draw_scene(&ctx, &scene);
    canvas.to_data_url_with_type("image/png").ok()
}

fn blob_url_from_str(s: &str, mime: &str) -> Option<String> {
    let arr = js_sys::Array::new();
    arr.push(&JsValue::from_str(s));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&arr, &opts).ok()?;
    web_sys::Url::create_object_url_with_blob(&blob).ok()
}

fn append_link(doc: &Document, head: &Element, link: &HeadLink) {
    let Ok(el) = doc.create_element("link") else {
        return;
    };
    for (name, value) in link.attributes() {
        el.set_attribute(name, value).ok();
    }
    el.set_attribute(GENERATED_ATTR, GENERATED_VALUE).ok();
    head.append_child(&el).ok();
}

fn remove_generated_links(doc: &Document) {
    let selector = format!("link[{GENERATED_ATTR}=\"{GENERATED_VALUE}\"]");
    for el in elements(doc.query_selector_all(&selector)) {
        if el.get_attribute("rel").as_deref() == Some("manifest") {
            if let Some(href) = el.get_attribute("href") {
                if href.starts_with("blob:") {
                    web_sys::Url::revoke_object_url(&href).ok();
                }
            }
        }
        el.remove();
    }
}

fn generate_icons_and_manifest(doc: &Document) {
    let Some(head) = doc.head() else {
        return;
    };
    let icons: Vec<IconAsset> = ICON_SIZES
        .iter()
        .filter_map(|&size| icon_data_url(doc, size).map(|href| IconAsset { size, href }))
        .collect();

    remove_generated_links(doc);
    for link in icon_links(&icons) {
        append_link(doc, &head, &link);
    }

    let manifest = WebManifest::build(&ManifestConfig::default(), &icons);
    let Ok(json) = manifest.to_json() else {
        return;
    };
    if let Some(url) = blob_url_from_str(&json, MANIFEST_MIME) {
        append_link(doc, &head, &manifest_link(&url));
    }
}

/// Regenerate the favicon links and manifest, replacing earlier ones.
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn regenerate_assets() {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        generate_icons_and_manifest(&doc);
    }
}

// Only `start` calls this, and `start` exists on wasm32 alone.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn init(window: &Window, doc: &Document) {
    stamp_year(doc);
    bind_nav(doc);
    bind_smooth_scroll(doc, window);
    bind_modal(doc, window);
    bind_calculator(doc);
    generate_icons_and_manifest(doc);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(doc) = window.document() else {
        return;
    };
    if ui::is_loading(&doc.ready_state()) {
        let win = window.clone();
        let d = doc.clone();
        listen(&doc, "DOMContentLoaded", move |_| init(&win, &d));
    } else {
        init(&window, &doc);
    }
}
