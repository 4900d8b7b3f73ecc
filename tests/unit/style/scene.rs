/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! An arena-backed scene graph implementing `Styleable`.

use rustc_hash::FxHashMap;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use style::converters::StyleConverter;
use style::properties::{CssMetaData, CssMetaDataList};
use style::pseudo_class::{PseudoClass, PseudoClassState};
use style::stylesheets::StyleOrigin;
use style::values::StyleValue;
use style::{Atom, CssFlags, SharedStyleContext, StyleHelper, Styleable, StyleableProperty};

use crate::stylist::Stylist;

pub const FILL: &str = "-fx-fill";
pub const STROKE: &str = "-fx-stroke";
pub const PADDING: &str = "-fx-padding";
pub const FONT: &str = "-fx-font";
pub const TEXT_FILL: &str = "-fx-text-fill";
pub const SPACING: &str = "-fx-spacing";

/// The descriptors of a shape: fill, stroke and padding, none inherited.
pub fn shape_meta_data() -> CssMetaDataList {
    let padding_sides = ["top", "right", "bottom", "left"]
        .iter()
        .map(|side| {
            Arc::new(CssMetaData::new(
                &format!("{}-{}", PADDING, side),
                StyleConverter::Size,
            ))
        })
        .collect();
    Arc::from(vec![
        Arc::new(CssMetaData::new(FILL, StyleConverter::Color)),
        Arc::new(CssMetaData::new(STROKE, StyleConverter::Color)),
        Arc::new(CssMetaData::new(PADDING, StyleConverter::Insets).with_sub_properties(padding_sides)),
    ])
}

/// The descriptors of a text node: an inherited font and text fill, and a
/// spacing that may be relative to the font.
pub fn text_meta_data() -> CssMetaDataList {
    Arc::from(vec![
        Arc::new(CssMetaData::new(FONT, StyleConverter::Font).inherited()),
        Arc::new(CssMetaData::new(TEXT_FILL, StyleConverter::Color).inherited()),
        Arc::new(CssMetaData::new(SPACING, StyleConverter::Size)),
    ])
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
struct PropertySlot {
    value: RefCell<Option<StyleValue>>,
    origin: Cell<Option<StyleOrigin>>,
    bound: Cell<bool>,
    rejects: Cell<bool>,
    applied: Cell<u32>,
}

struct Node {
    name: String,
    classes: Vec<Atom>,
    parent: Option<usize>,
    pseudo_classes: RefCell<PseudoClassState>,
    meta_data: CssMetaDataList,
    properties: FxHashMap<Atom, PropertySlot>,
    helper: RefCell<Option<StyleHelper>>,
    reapply_requested: Cell<bool>,
}

#[derive(Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// Add a node with the given style classes. Parents must be added before
    /// their children.
    pub fn add(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        classes: &[&str],
        meta_data: CssMetaDataList,
    ) -> NodeId {
        let properties = meta_data
            .iter()
            .map(|meta| (meta.property().clone(), PropertySlot::default()))
            .collect();
        self.nodes.push(Node {
            name: name.to_owned(),
            classes: classes.iter().map(|class| Atom::from(*class)).collect(),
            parent: parent.map(NodeId::index),
            pseudo_classes: RefCell::new(PseudoClassState::new()),
            meta_data,
            properties,
            helper: RefCell::new(None),
            reapply_requested: Cell::new(false),
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef {
            scene: self,
            index: id.index(),
        }
    }

    /// Style every node, parents first. Nodes that asked for it are
    /// reapplied whatever `flags` says.
    pub fn process_css(&self, context: &SharedStyleContext, stylist: &Stylist, flags: CssFlags) {
        for index in 0..self.nodes.len() {
            let node = NodeRef { scene: self, index };
            let flags = if node.take_reapply_request() {
                CssFlags::Reapply
            } else {
                flags
            };
            context.process_css(stylist, node, flags);
        }
    }
}

#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    scene: &'a Scene,
    index: usize,
}

impl<'a> NodeRef<'a> {
    fn data(&self) -> &'a Node {
        &self.scene.nodes[self.index]
    }

    fn slot(&self, property: &str) -> &'a PropertySlot {
        &self.data().properties[&Atom::from(property)]
    }

    pub fn id(&self) -> NodeId {
        NodeId(self.index)
    }

    pub fn has_class(&self, class: &Atom) -> bool {
        self.data().classes.contains(class)
    }

    pub fn set_pseudo_class(&self, name: &str, active: bool) {
        let pseudo_class = PseudoClass::new(name);
        let mut states = self.data().pseudo_classes.borrow_mut();
        if active {
            states.insert(pseudo_class);
        } else {
            states.remove(&pseudo_class);
        }
    }

    pub fn value(&self, property: &str) -> Option<StyleValue> {
        self.slot(property).value.borrow().clone()
    }

    pub fn origin(&self, property: &str) -> Option<StyleOrigin> {
        self.slot(property).origin.get()
    }

    /// How many times CSS set `property`.
    pub fn applied_count(&self, property: &str) -> u32 {
        self.slot(property).applied.get()
    }

    /// Set `property` from application code.
    pub fn set_user_value(&self, property: &str, value: StyleValue) {
        let slot = self.slot(property);
        *slot.value.borrow_mut() = Some(value);
        slot.origin.set(Some(StyleOrigin::User));
    }

    pub fn bind(&self, property: &str) {
        self.slot(property).bound.set(true);
    }

    pub fn reject_styles(&self, property: &str) {
        self.slot(property).rejects.set(true);
    }

    pub fn reapply_requested(&self) -> bool {
        self.data().reapply_requested.get()
    }

    fn take_reapply_request(&self) -> bool {
        self.data().reapply_requested.replace(false)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.data().name)
    }
}

impl<'a> Styleable for NodeRef<'a> {
    type Property = PropertyRef<'a>;

    fn styleable_parent(&self) -> Option<Self> {
        self.data().parent.map(|index| NodeRef {
            scene: self.scene,
            index,
        })
    }

    fn css_meta_data(&self) -> CssMetaDataList {
        self.data().meta_data.clone()
    }

    fn matches_compound(&self, compound: &str) -> bool {
        compound
            .strip_prefix('.')
            .is_some_and(|class| self.has_class(&Atom::from(class)))
    }

    fn pseudo_class_states(&self) -> PseudoClassState {
        self.data().pseudo_classes.borrow().clone()
    }

    fn styleable_property(&self, meta: &CssMetaData) -> Option<PropertyRef<'a>> {
        self.data().properties.get(meta.property()).map(PropertyRef)
    }

    fn style_helper(&self) -> Option<Ref<'_, StyleHelper>> {
        Ref::filter_map(self.data().helper.borrow(), |helper| helper.as_ref()).ok()
    }

    fn style_helper_mut(&self) -> Option<RefMut<'_, StyleHelper>> {
        RefMut::filter_map(self.data().helper.borrow_mut(), |helper| helper.as_mut()).ok()
    }

    fn set_style_helper(&self, helper: Option<StyleHelper>) -> Option<StyleHelper> {
        self.data().helper.replace(helper)
    }

    fn request_css_reapply(&self) {
        self.data().reapply_requested.set(true);
    }
}

pub struct PropertyRef<'a>(&'a PropertySlot);

impl StyleableProperty for PropertyRef<'_> {
    fn value(&self) -> Option<StyleValue> {
        self.0.value.borrow().clone()
    }

    fn style_origin(&self) -> Option<StyleOrigin> {
        self.0.origin.get()
    }

    fn apply_style(
        &self,
        origin: Option<StyleOrigin>,
        value: Option<StyleValue>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.0.rejects.get() {
            return Err(format!("cannot set {:?}", value).into());
        }
        *self.0.value.borrow_mut() = value;
        self.0.origin.set(origin);
        self.0.applied.set(self.0.applied.get() + 1);
        Ok(())
    }

    fn is_settable(&self) -> bool {
        !self.0.bound.get()
    }
}
