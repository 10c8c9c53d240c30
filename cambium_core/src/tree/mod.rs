// Copyright 2026 the Cambium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer-tree container.
//!
//! A [`LayerTree`] owns its layers (keyed by [`LayerId`]), the shared
//! [`PropertyTrees`], and the bookkeeping that layers report into:
//!
//! - the **pending-push list**: layers with state not yet pushed to the
//!   active tree, each listed at most once;
//! - the **element map**: [`ElementId`] → layer, used by the animation
//!   system;
//! - the **scroll registry**: scroll-clip layer → the layer it clips;
//! - the **notification queues** for scroll-state and scroll-offset
//!   updates, drained with [`take_scroll_state_updates`] and
//!   [`take_scroll_offset_updates`].
//!
//! A pipeline holds two trees: a `LayerTree<Pending>` mutated by the
//! producer and a `LayerTree<Active>` that is drawn. Once per production
//! cycle the producer calls
//! [`push_properties_to_tree`](LayerTree::push_properties_to_tree), which
//! replicates every dirty pending layer into its active counterpart.
//!
//! All layer operations are methods on the tree taking a [`LayerId`].
//! Passing an id with no layer behind it panics.
//!
//! [`take_scroll_state_updates`]: LayerTree::take_scroll_state_updates
//! [`take_scroll_offset_updates`]: LayerTree::take_scroll_offset_updates

mod animation;
mod draw;
mod mutate;
mod phase;
mod push;
mod query;
mod scroll;
mod settings;

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::animation::{MutatorHost, NoAnimations};
use crate::layer::{ElementId, Layer, LayerId, LayerKind, MutableProperties};
use crate::property_trees::PropertyTrees;
use crate::trace::{LayerCreatedEvent, LayerDestroyedEvent, TraceSink, Tracer};

pub use phase::{Active, Pending, TreePhase};
pub use settings::LayerTreeSettings;

/// The layers that play a viewport role, by id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportLayers {
    /// Clips the inner (visual) viewport.
    pub inner_viewport_container: Option<LayerId>,
    /// Clips the outer (layout) viewport.
    pub outer_viewport_container: Option<LayerId>,
    /// Scrolls the inner viewport.
    pub inner_viewport_scroll: Option<LayerId>,
    /// Scrolls the outer viewport.
    pub outer_viewport_scroll: Option<LayerId>,
}

/// What the element map records for an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementMapEntry {
    /// The layer carrying the element id.
    pub layer: LayerId,
    /// That layer's mutable properties.
    pub mutable_properties: MutableProperties,
}

/// A set of layers sharing one set of property trees.
///
/// `P` is [`Pending`] or [`Active`].
#[derive(Debug)]
pub struct LayerTree<P: TreePhase> {
    layers: BTreeMap<LayerId, Layer>,
    property_trees: PropertyTrees,

    element_map: BTreeMap<ElementId, ElementMapEntry>,
    clip_scroll_map: BTreeMap<LayerId, LayerId>,
    layers_to_push: Vec<LayerId>,

    needs_update_draw_properties: bool,
    scroll_state_updates: Vec<LayerId>,
    scroll_offset_updates: Vec<LayerId>,

    root_layer: Option<LayerId>,
    viewport: ViewportLayers,
    settings: LayerTreeSettings,
    device_scale_factor: f32,
    page_scale_factor: f32,

    mutator_host: Rc<dyn MutatorHost>,
    tracer: Tracer,
    _phase: PhantomData<P>,
}

impl<P: TreePhase> Default for LayerTree<P> {
    fn default() -> Self {
        Self::new(LayerTreeSettings::new(), Rc::new(NoAnimations))
    }
}

impl<P: TreePhase> LayerTree<P> {
    /// Creates an empty tree.
    ///
    /// The pending and active trees of one pipeline normally share the same
    /// `mutator_host`.
    #[must_use]
    pub fn new(settings: LayerTreeSettings, mutator_host: Rc<dyn MutatorHost>) -> Self {
        Self {
            layers: BTreeMap::new(),
            property_trees: PropertyTrees::new(),
            element_map: BTreeMap::new(),
            clip_scroll_map: BTreeMap::new(),
            layers_to_push: Vec::new(),
            needs_update_draw_properties: false,
            scroll_state_updates: Vec::new(),
            scroll_offset_updates: Vec::new(),
            root_layer: None,
            viewport: ViewportLayers::default(),
            settings,
            device_scale_factor: 1.0,
            page_scale_factor: 1.0,
            mutator_host,
            tracer: Tracer::none(),
            _phase: PhantomData,
        }
    }

    /// Installs a trace sink, replacing any previous one.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: alloc::boxed::Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Whether this is the active tree.
    #[must_use]
    pub const fn is_active_tree(&self) -> bool {
        P::IS_ACTIVE
    }

    /// The tree-wide settings.
    #[must_use]
    pub const fn settings(&self) -> &LayerTreeSettings {
        &self.settings
    }

    /// The shared property trees.
    #[must_use]
    pub const fn property_trees(&self) -> &PropertyTrees {
        &self.property_trees
    }

    /// The shared property trees, for building and updating them.
    pub fn property_trees_mut(&mut self) -> &mut PropertyTrees {
        &mut self.property_trees
    }

    /// The animation query interface.
    #[must_use]
    pub fn mutator_host(&self) -> &dyn MutatorHost {
        &*self.mutator_host
    }

    /// Device pixels per layout pixel.
    #[must_use]
    pub const fn device_scale_factor(&self) -> f32 {
        self.device_scale_factor
    }

    /// Sets the device scale factor.
    pub fn set_device_scale_factor(&mut self, scale: f32) {
        self.device_scale_factor = scale;
    }

    /// The current page (pinch-zoom) scale.
    #[must_use]
    pub const fn current_page_scale_factor(&self) -> f32 {
        self.page_scale_factor
    }

    /// Sets the current page scale factor.
    pub fn set_page_scale_factor(&mut self, scale: f32) {
        self.page_scale_factor = scale;
    }

    // -- Registry --

    /// Creates a layer, registers it, and marks it as needing a push.
    ///
    /// # Panics
    ///
    /// Panics if a layer with `id` already exists.
    pub fn create_layer(&mut self, id: LayerId, kind: LayerKind) {
        assert!(
            !self.layers.contains_key(&id),
            "layer {id:?} already exists"
        );
        self.layers.insert(id, Layer::new(id, kind));
        self.add_to_element_map(id);
        self.tracer.layer_created(&LayerCreatedEvent {
            layer: id,
            active_tree: P::IS_ACTIVE,
        });
        self.set_needs_push_properties(id);
    }

    /// Destroys a layer and returns it.
    ///
    /// Unregisters the layer from the scroll registry first (while it is
    /// still resolvable), then from the id map, then from the element map.
    ///
    /// # Panics
    ///
    /// Panics if the layer does not exist or is inside a draw bracket.
    pub fn destroy_layer(&mut self, id: LayerId) -> Layer {
        assert!(
            self.layer(id).current_draw_mode == crate::layer::DrawMode::None,
            "cannot destroy layer {id:?} while it is drawing"
        );
        self.unregister_scroll_layer(id);
        let Some(layer) = self.layers.remove(&id) else {
            unreachable!("layer existence checked above");
        };
        self.remove_element(id, layer.element_id);
        self.layers_to_push.retain(|&l| l != id);
        if self.root_layer == Some(id) {
            self.root_layer = None;
        }
        self.tracer.layer_destroyed(&LayerDestroyedEvent {
            layer: id,
            active_tree: P::IS_ACTIVE,
        });
        layer
    }

    /// Returns the layer with `id`, if any.
    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    /// Returns the layer with `id`.
    ///
    /// # Panics
    ///
    /// Panics if there is no such layer.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> &Layer {
        match self.layers.get(&id) {
            Some(layer) => layer,
            None => panic!("unknown layer {id:?}"),
        }
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        match self.layers.get_mut(&id) {
            Some(layer) => layer,
            None => panic!("unknown layer {id:?}"),
        }
    }

    /// Returns `true` if a layer with `id` exists.
    #[must_use]
    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the tree has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layer ids, ascending.
    pub fn layer_ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    /// The root layer, if set.
    #[must_use]
    pub const fn root_layer(&self) -> Option<LayerId> {
        self.root_layer
    }

    /// Sets the root layer.
    pub fn set_root_layer(&mut self, id: Option<LayerId>) {
        self.root_layer = id;
    }

    /// Whether `id` is the root layer.
    #[must_use]
    pub fn is_root_layer(&self, id: LayerId) -> bool {
        self.root_layer == Some(id)
    }

    /// The viewport role assignments.
    #[must_use]
    pub const fn viewport_layers(&self) -> &ViewportLayers {
        &self.viewport
    }

    /// Assigns the viewport roles.
    pub fn set_viewport_layers(&mut self, viewport: ViewportLayers) {
        self.viewport = viewport;
    }

    // -- Pending push --

    /// Layers with state not yet pushed, in the order they became dirty.
    #[must_use]
    pub fn layers_that_should_push_properties(&self) -> &[LayerId] {
        &self.layers_to_push
    }

    pub(crate) fn add_layer_should_push_properties(&mut self, id: LayerId) {
        self.layers_to_push.push(id);
    }

    pub(crate) fn remove_layer_should_push_properties(&mut self, id: LayerId) {
        self.layers_to_push.retain(|&l| l != id);
    }

    // -- Draw-property invalidation --

    /// Whether a draw-properties pass must run before the next draw.
    #[must_use]
    pub const fn needs_update_draw_properties(&self) -> bool {
        self.needs_update_draw_properties
    }

    /// Requests a draw-properties pass.
    pub fn set_needs_update_draw_properties(&mut self) {
        self.needs_update_draw_properties = true;
    }

    /// Records that a draw-properties pass has run.
    pub fn did_update_draw_properties(&mut self) {
        self.needs_update_draw_properties = false;
    }

    // -- Element map --

    /// The element-map record for `element`.
    #[must_use]
    pub fn element_map_entry(&self, element: ElementId) -> Option<&ElementMapEntry> {
        self.element_map.get(&element)
    }

    /// The layer carrying `element`.
    #[must_use]
    pub fn layer_id_by_element_id(&self, element: ElementId) -> Option<LayerId> {
        self.element_map.get(&element).map(|entry| entry.layer)
    }

    /// Adds (or refreshes) `id` in the element map. Layers without an
    /// element id are not mapped.
    pub(crate) fn add_to_element_map(&mut self, id: LayerId) {
        let layer = self.layer(id);
        let Some(element) = layer.element_id else {
            return;
        };
        let entry = ElementMapEntry {
            layer: id,
            mutable_properties: layer.mutable_properties,
        };
        self.element_map.insert(element, entry);
    }

    pub(crate) fn remove_from_element_map(&mut self, id: LayerId) {
        let element = self.layer(id).element_id;
        self.remove_element(id, element);
    }

    fn remove_element(&mut self, id: LayerId, element: Option<ElementId>) {
        let Some(element) = element else {
            return;
        };
        if self.element_map.get(&element).is_some_and(|e| e.layer == id) {
            self.element_map.remove(&element);
        }
    }

    // -- Scroll registry --

    /// The scrolling layer clipped by `clip_layer`, if any.
    #[must_use]
    pub fn scroll_layer_for_clip(&self, clip_layer: LayerId) -> Option<LayerId> {
        self.clip_scroll_map.get(&clip_layer).copied()
    }

    pub(crate) fn register_scroll_layer(&mut self, id: LayerId) {
        let Some(clip) = self.layer(id).scroll_clip_layer_id else {
            return;
        };
        self.clip_scroll_map.insert(clip, id);
        self.did_update_scroll_state(id);
    }

    pub(crate) fn unregister_scroll_layer(&mut self, id: LayerId) {
        let Some(clip) = self.layer(id).scroll_clip_layer_id else {
            return;
        };
        if self.clip_scroll_map.get(&clip) == Some(&id) {
            self.clip_scroll_map.remove(&clip);
        }
    }

    // -- Notifications --

    /// Records that scroll state associated with `id` may have changed.
    ///
    /// A scroll-clip layer reports on behalf of the layer it clips.
    pub fn did_update_scroll_state(&mut self, id: LayerId) {
        let scroll_layer = self.clip_scroll_map.get(&id).copied().unwrap_or(id);
        if !self.scroll_state_updates.contains(&scroll_layer) {
            self.scroll_state_updates.push(scroll_layer);
        }
    }

    /// Records that the scroll offset of `id` changed.
    pub fn did_update_scroll_offset(&mut self, id: LayerId) {
        if !self.scroll_offset_updates.contains(&id) {
            self.scroll_offset_updates.push(id);
        }
    }

    /// Drains the layers whose scroll state may have changed.
    pub fn take_scroll_state_updates(&mut self) -> Vec<LayerId> {
        core::mem::take(&mut self.scroll_state_updates)
    }

    /// Drains the layers whose scroll offset changed.
    pub fn take_scroll_offset_updates(&mut self) -> Vec<LayerId> {
        core::mem::take(&mut self.scroll_offset_updates)
    }
}
