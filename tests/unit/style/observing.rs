/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;
use style::stylesheets::Style;
use style::values::{Color, ParsedValue};
use style::{CssFlags, Styleable};

use crate::harness::context;
use crate::scene::{FILL, FONT, NodeId, Scene, shape_meta_data, text_meta_data};
use crate::stylist::{Rule, Stylist};

fn selectors(styles: &[Arc<Style>]) -> Vec<String> {
    styles.iter().map(|style| style.selector.to_string()).collect()
}

fn scene_and_stylist() -> (Scene, Stylist, NodeId) {
    let mut scene = Scene::new();
    let root = scene.add(None, "root", &["root"], shape_meta_data());
    let rect = scene.add(Some(root), "rect", &["rect"], shape_meta_data());

    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("root").declare("-fx-base", ParsedValue::color(Color::RED)));
    stylist.add_rule(Rule::new("rect").declare(FILL, ParsedValue::lookup("-fx-base")));
    stylist.add_rule(
        Rule::new("rect")
            .when(&["hover"])
            .declare(FILL, ParsedValue::color(Color::BLUE)),
    );
    (scene, stylist, rect)
}

#[test]
fn observed_styles_include_lookups() {
    let (context, _) = context();
    let (scene, stylist, rect) = scene_and_stylist();
    let rect = scene.node(rect);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert!(rect.style_helper().and_then(|h| h.observed_styles(FILL)).is_none());

    if let Some(mut helper) = rect.style_helper_mut() {
        helper.set_observing_styles(true);
    }
    scene.process_css(&context, &stylist, CssFlags::Update);
    let observed = rect.style_helper().and_then(|h| h.observed_styles(FILL)).unwrap();
    assert_eq!(selectors(&observed), [".rect", ".root"]);

    rect.set_pseudo_class("hover", true);
    scene.process_css(&context, &stylist, CssFlags::Update);
    let observed = rect.style_helper().and_then(|h| h.observed_styles(FILL)).unwrap();
    assert_eq!(selectors(&observed), [".rect:hover"]);

    if let Some(mut helper) = rect.style_helper_mut() {
        helper.set_observing_styles(false);
    }
    assert!(rect.style_helper().and_then(|h| h.observed_styles(FILL)).is_none());
}

#[test]
fn matching_styles_whatever_the_state() {
    let (context, _) = context();
    let (scene, stylist, rect) = scene_and_stylist();
    let rect = scene.node(rect);
    scene.process_css(&context, &stylist, CssFlags::Update);

    let meta_data = rect.css_meta_data();
    let styles = rect
        .style_helper()
        .map(|h| h.matching_styles(rect, &meta_data[0]))
        .unwrap();
    assert_eq!(selectors(&styles), [".rect:hover", ".rect", ".root"]);
}

#[test]
fn matching_styles_of_inherited_properties() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let group = scene.add(None, "group", &["group"], text_meta_data());
    let label = scene.add(Some(group), "label", &["label"], text_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("group").declare(FONT, ParsedValue::font(Some("Arial"), None, None, None)));
    scene.process_css(&context, &stylist, CssFlags::Update);

    let label = scene.node(label);
    let meta_data = label.css_meta_data();
    let styles = label
        .style_helper()
        .map(|h| h.matching_styles(label, &meta_data[0]))
        .unwrap();
    assert_eq!(selectors(&styles), [".group"]);
}
