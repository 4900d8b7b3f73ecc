/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A matcher for rules of the form `.a:x .b:y`.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::iter;
use std::sync::Arc;
use style::pseudo_class::PseudoClassState;
use style::style_map::{StyleMap, StyleMatcher};
use style::stylesheets::{CascadingStyle, Declaration, Selector, Style, StyleOrigin};
use style::values::ParsedValue;
use style::{Atom, SharedStyleContext, Styleable};

use crate::scene::{NodeId, NodeRef};

/// Inline styles win over any rule.
const INLINE_SPECIFICITY: u32 = 1 << 16;

pub struct Rule {
    class: Atom,
    pseudo_classes: PseudoClassState,
    ancestor: Option<(Atom, PseudoClassState)>,
    origin: StyleOrigin,
    declarations: Vec<(String, ParsedValue)>,
}

impl Rule {
    pub fn new(class: &str) -> Self {
        Rule {
            class: Atom::from(class),
            pseudo_classes: PseudoClassState::new(),
            ancestor: None,
            origin: StyleOrigin::Author,
            declarations: Vec::new(),
        }
    }

    pub fn user_agent(mut self) -> Self {
        self.origin = StyleOrigin::UserAgent;
        self
    }

    pub fn when(mut self, pseudo_classes: &[&str]) -> Self {
        self.pseudo_classes = PseudoClassState::from_names(pseudo_classes.iter().copied());
        self
    }

    pub fn descendant_of(mut self, class: &str, pseudo_classes: &[&str]) -> Self {
        self.ancestor = Some((
            Atom::from(class),
            PseudoClassState::from_names(pseudo_classes.iter().copied()),
        ));
        self
    }

    pub fn declare(mut self, property: &str, value: ParsedValue) -> Self {
        self.declarations.push((property.to_owned(), value));
        self
    }

    fn selector(&self) -> Selector {
        let mut text = String::new();
        if let Some((ref class, ref states)) = self.ancestor {
            text.push_str(&compound(class, states));
            text.push(' ');
        }
        text.push_str(&compound(&self.class, &self.pseudo_classes));

        let mut selector = Selector::new(&text).with_pseudo_classes(self.pseudo_classes.clone());
        if let Some((ref class, ref states)) = self.ancestor {
            selector = selector.with_ancestor(&format!(".{}", class), states.clone());
        }
        selector
    }

    fn specificity(&self) -> u32 {
        let subject = 10 * (1 + self.pseudo_classes.len() as u32);
        let ancestor = self
            .ancestor
            .as_ref()
            .map_or(0, |(_, states)| 10 * (1 + states.len() as u32));
        subject + ancestor
    }
}

fn compound(class: &Atom, states: &PseudoClassState) -> String {
    let mut text = format!(".{}", class);
    for pseudo_class in states.iter() {
        text.push_str(&pseudo_class.to_string());
    }
    text
}

struct CompiledRule {
    class: Atom,
    ancestor: Option<(Atom, PseudoClassState)>,
    selector: Selector,
    styles: Vec<CascadingStyle>,
}

#[derive(Eq, Hash, PartialEq)]
struct MapKey {
    rules: Vec<usize>,
    inline: Option<NodeId>,
}

/// Matches rules by style class, and keeps one style map per set of
/// matched rules so that nodes matching the same rules share caches.
#[derive(Default)]
pub struct Stylist {
    rules: Vec<CompiledRule>,
    inline: FxHashMap<NodeId, Vec<CascadingStyle>>,
    next_ordinal: u32,
    maps: Mutex<FxHashMap<MapKey, Arc<StyleMap>>>,
}

impl Stylist {
    pub fn new() -> Self {
        Stylist::default()
    }

    pub fn add_rule(&mut self, rule: Rule) {
        let selector = rule.selector();
        let specificity = rule.specificity();
        let mut styles = Vec::with_capacity(rule.declarations.len());
        for (property, value) in rule.declarations {
            let declaration =
                Declaration::new(&property, value, rule.origin).with_stylesheet_url("test.css");
            let style = Arc::new(Style::new(selector.clone(), declaration));
            styles.push(CascadingStyle::new(style, specificity, self.next_ordinal));
            self.next_ordinal += 1;
        }
        self.rules.push(CompiledRule {
            class: rule.class,
            ancestor: rule.ancestor,
            selector,
            styles,
        });
        self.maps.get_mut().clear();
    }

    pub fn set_inline_style(&mut self, node: NodeId, declarations: Vec<(&str, ParsedValue)>) {
        let selector = Selector::new("*");
        let mut styles = Vec::with_capacity(declarations.len());
        for (property, value) in declarations {
            let declaration = Declaration::new(property, value, StyleOrigin::Inline);
            let style = Arc::new(Style::new(selector.clone(), declaration));
            styles.push(CascadingStyle::new(style, INLINE_SPECIFICITY, self.next_ordinal));
            self.next_ordinal += 1;
        }
        self.inline.insert(node, styles);
        self.maps.get_mut().clear();
    }
}

impl<'a> StyleMatcher<NodeRef<'a>> for Stylist {
    fn find_matching_styles(
        &self,
        context: &SharedStyleContext,
        node: NodeRef<'a>,
        trigger_states: &mut [PseudoClassState],
    ) -> Option<Arc<StyleMap>> {
        let mut matched = Vec::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if !node.has_class(&rule.class) {
                continue;
            }
            // The depths of the ancestors that may satisfy the ancestor
            // compound, from the node's parent at depth 1.
            let ancestors: Vec<usize> = match rule.ancestor {
                Some((ref class, _)) => {
                    let depths: Vec<usize> =
                        iter::successors(node.styleable_parent(), |n| n.styleable_parent())
                            .enumerate()
                            .filter(|(_, ancestor)| ancestor.has_class(class))
                            .map(|(depth, _)| depth + 1)
                            .collect();
                    if depths.is_empty() {
                        continue;
                    }
                    depths
                },
                None => Vec::new(),
            };
            matched.push(index);

            if let Some(states) = trigger_states.get_mut(0) {
                states.union_with(rule.selector.pseudo_classes());
            }
            if let Some(required) = rule.selector.ancestors().first() {
                for depth in ancestors {
                    if let Some(states) = trigger_states.get_mut(depth) {
                        states.union_with(&required.pseudo_classes);
                    }
                }
            }
        }

        let inline = self.inline.get(&node.id());
        if matched.is_empty() && inline.is_none() {
            return None;
        }

        let key = MapKey {
            rules: matched,
            inline: inline.map(|_| node.id()),
        };
        let mut maps = self.maps.lock();
        if let Some(map) = maps.get(&key) {
            return Some(map.clone());
        }

        let styles = key
            .rules
            .iter()
            .flat_map(|&index| self.rules[index].styles.iter().cloned())
            .chain(inline.into_iter().flatten().cloned());
        let map = Arc::new(StyleMap::new(context.allocate_style_map_id(), styles));
        maps.insert(key, map.clone());
        Some(map)
    }
}
