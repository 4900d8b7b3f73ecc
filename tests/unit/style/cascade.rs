/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use style::pseudo_class::PseudoClass;
use style::values::{Color, Insets, ParsedValue, SizeUnits, StyleValue};
use style::{CssFlags, StyleOrigin, Styleable};

use crate::harness::{color, context};
use crate::scene::{FILL, PADDING, STROKE, Scene, TEXT_FILL, shape_meta_data, text_meta_data};
use crate::stylist::{Rule, Stylist};

#[test]
fn user_agent_styles_do_not_override_user_values() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .user_agent()
            .declare(FILL, ParsedValue::color(Color::BLUE))
            .declare(STROKE, ParsedValue::color(Color::BLUE)),
    );

    let rect = scene.node(rect);
    rect.set_user_value(FILL, StyleValue::Color(Color::RED));
    scene.process_css(&context, &stylist, CssFlags::Update);

    assert_eq!(rect.value(FILL), color(Color::RED));
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::User));
    assert_eq!(rect.value(STROKE), color(Color::BLUE));
    assert_eq!(rect.origin(STROKE), Some(StyleOrigin::UserAgent));
}

#[test]
fn author_styles_override_user_values() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("rect").declare(FILL, ParsedValue::color(Color::BLUE)));

    let rect = scene.node(rect);
    rect.set_user_value(FILL, StyleValue::Color(Color::RED));
    scene.process_css(&context, &stylist, CssFlags::Update);

    assert_eq!(rect.value(FILL), color(Color::BLUE));
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::Author));
}

#[test]
fn inline_styles_win() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("rect").declare(FILL, ParsedValue::color(Color::BLUE)));
    stylist.set_inline_style(rect, vec![(FILL, ParsedValue::color(Color::GREEN))]);

    scene.process_css(&context, &stylist, CssFlags::Update);
    let rect = scene.node(rect);
    assert_eq!(rect.value(FILL), color(Color::GREEN));
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::Inline));
}

#[test]
fn inheriting_properties_take_the_value_of_an_ancestor() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let group = scene.add(None, "group", &["group"], text_meta_data());
    let middle = scene.add(Some(group), "middle", &["middle"], text_meta_data());
    let label = scene.add(Some(middle), "label", &["label"], text_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("group").declare(TEXT_FILL, ParsedValue::color(Color::GREEN)));
    stylist.add_rule(Rule::new("middle").declare("-fx-other", ParsedValue::number(1.)));

    scene.process_css(&context, &stylist, CssFlags::Update);

    // The middle node has styles, but none for the text fill.
    let label = scene.node(label);
    assert_eq!(label.value(TEXT_FILL), color(Color::GREEN));
    assert_eq!(label.origin(TEXT_FILL), Some(StyleOrigin::Author));
    assert_eq!(scene.node(middle).value(TEXT_FILL), color(Color::GREEN));
}

#[test]
fn explicit_inherit_takes_the_parent_style() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let group = scene.add(None, "group", &["group"], text_meta_data());
    let label = scene.add(Some(group), "label", &["label"], text_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("group").declare(TEXT_FILL, ParsedValue::color(Color::GREEN)));
    stylist.add_rule(Rule::new("label").declare(TEXT_FILL, ParsedValue::ident("inherit")));

    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(scene.node(label).value(TEXT_FILL), color(Color::GREEN));
}

#[test]
fn null_resets_the_property() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("rect").declare(FILL, ParsedValue::null()));

    let rect = scene.node(rect);
    rect.set_user_value(FILL, StyleValue::Color(Color::RED));
    scene.process_css(&context, &stylist, CssFlags::Update);

    assert_eq!(rect.value(FILL), None);
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::Author));
}

#[test]
fn composite_values_are_built_from_sub_properties() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .declare("-fx-padding-top", ParsedValue::px(4.))
            .declare("-fx-padding-left", ParsedValue::size(1., SizeUnits::Em)),
    );

    scene.process_css(&context, &stylist, CssFlags::Update);
    let rect = scene.node(rect);
    assert_eq!(
        rect.value(PADDING),
        Some(StyleValue::Insets(Insets::new(4., 0., 0., 13.)))
    );
    assert_eq!(rect.origin(PADDING), Some(StyleOrigin::Author));
}

#[test]
fn leaving_a_state_puts_back_the_initial_value() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .when(&["hover"])
            .declare(FILL, ParsedValue::color(Color::RED)),
    );
    let rect = scene.node(rect);

    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), None);
    assert!(rect.style_helper().is_some_and(|h| h.affects_node(&PseudoClass::new("hover"))));
    assert!(rect.style_helper().is_some_and(|h| !h.affects_node(&PseudoClass::new("focused"))));

    rect.set_pseudo_class("hover", true);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), color(Color::RED));
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::Author));

    rect.set_pseudo_class("hover", false);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), None);
    assert_eq!(rect.origin(FILL), None);
}

#[test]
fn ancestors_learn_which_of_their_states_matter() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let group = scene.add(None, "group", &["group"], shape_meta_data());
    let rect = scene.add(Some(group), "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .descendant_of("group", &["hover"])
            .declare(FILL, ParsedValue::color(Color::RED)),
    );

    scene.process_css(&context, &stylist, CssFlags::Update);
    let (group, rect) = (scene.node(group), scene.node(rect));
    let hover = PseudoClass::new("hover");
    assert!(group.style_helper().is_some_and(|h| h.affects_node(&hover) && !h.has_styles()));
    assert!(rect.style_helper().is_some_and(|h| !h.affects_node(&hover)));
    assert_eq!(rect.value(FILL), None);

    group.set_pseudo_class("hover", true);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), color(Color::RED));
}

#[test]
fn bound_properties_are_left_alone() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(Rule::new("rect").declare(FILL, ParsedValue::color(Color::RED)));

    let rect = scene.node(rect);
    rect.bind(FILL);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.applied_count(FILL), 0);
}

#[test]
fn ancestor_states_are_read_from_the_matching_ancestor() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let group = scene.add(None, "group", &["group"], shape_meta_data());
    let hovered = scene.add(Some(group), "hovered", &[], shape_meta_data());
    let first = scene.add(Some(hovered), "first", &["rect"], shape_meta_data());
    let plain = scene.add(Some(group), "plain", &[], shape_meta_data());
    let second = scene.add(Some(plain), "second", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .descendant_of("group", &["hover"])
            .declare(FILL, ParsedValue::color(Color::RED)),
    );

    // Only the group may satisfy `.group:hover`.
    scene.node(hovered).set_pseudo_class("hover", true);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(scene.node(first).value(FILL), None);
    assert_eq!(scene.node(second).value(FILL), None);

    scene.node(group).set_pseudo_class("hover", true);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(scene.node(first).value(FILL), color(Color::RED));
    assert_eq!(scene.node(second).value(FILL), color(Color::RED));

    scene.node(group).set_pseudo_class("hover", false);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(scene.node(first).value(FILL), None);
    assert_eq!(scene.node(second).value(FILL), None);
}

#[test]
fn leaving_a_state_puts_back_the_user_value() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .when(&["hover"])
            .declare(FILL, ParsedValue::color(Color::BLUE)),
    );
    let rect = scene.node(rect);
    rect.set_user_value(FILL, StyleValue::Color(Color::RED));

    rect.set_pseudo_class("hover", true);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), color(Color::BLUE));
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::Author));

    rect.set_pseudo_class("hover", false);
    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), color(Color::RED));
    assert_eq!(rect.origin(FILL), Some(StyleOrigin::User));
}

#[test]
fn styles_going_away_put_back_initial_values() {
    let (context, _) = context();
    let mut scene = Scene::new();
    let rect = scene.add(None, "rect", &["rect"], shape_meta_data());
    let mut stylist = Stylist::new();
    stylist.add_rule(
        Rule::new("rect")
            .declare(FILL, ParsedValue::color(Color::RED))
            .declare(STROKE, ParsedValue::color(Color::GREEN)),
    );
    let rect = scene.node(rect);
    rect.set_user_value(STROKE, StyleValue::Color(Color::BLUE));

    scene.process_css(&context, &stylist, CssFlags::Update);
    assert_eq!(rect.value(FILL), color(Color::RED));
    assert_eq!(rect.value(STROKE), color(Color::GREEN));

    context.invalidate();
    scene.process_css(&context, &Stylist::new(), CssFlags::Reapply);
    assert!(!rect.has_style_helper());
    assert_eq!(rect.value(FILL), None);
    assert_eq!(rect.origin(FILL), None);
    assert_eq!(rect.value(STROKE), color(Color::BLUE));
    assert_eq!(rect.origin(STROKE), Some(StyleOrigin::User));
}
