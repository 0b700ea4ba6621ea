mod driver;
mod frame;
mod search;

use eframe::egui::{Pos2, Vec2};

use crate::dataset::Dataset;
use crate::graph::{Query, TypeFilter, filter};
use crate::history::{HistoryAction, HistoryState, reduce};
use crate::interaction::{GestureEvent, PressTarget, ViewController, ViewTransform};
use crate::physics::LayoutConfig;
pub use driver::{LayoutDriver, TickOutcome};
pub use frame::{Frame, FrameLink};
pub use search::Suggestion;

const MIN_HIT_RADIUS: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetSearchTerm(String),
    SetEntityTypeFilter(String),
    SetRelationTypeFilter(String),
    SelectNode(String),
    HistoryBack,
    HistoryForward,
    ClearSelection,
    ResetAll,
    LoadDataset(Dataset),
    StartDrag(String),
    DragTo(Pos2),
    EndDrag,
    ZoomPanTo(ViewTransform),
    ZoomAt { pointer: Pos2, factor: f32 },
    PanBy(Vec2),
    SetViewport(Vec2),
}

impl From<GestureEvent> for Command {
    fn from(event: GestureEvent) -> Self {
        match event {
            GestureEvent::SelectNode(id) => Self::SelectNode(id),
            GestureEvent::ClearSelection => Self::ClearSelection,
            GestureEvent::StartDrag(id) => Self::StartDrag(id),
            GestureEvent::DragTo(position) => Self::DragTo(position),
            GestureEvent::EndDrag => Self::EndDrag,
            GestureEvent::PanBy(delta) => Self::PanBy(delta),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DegreeCounts {
    pub inbound: usize,
    pub outbound: usize,
}

pub struct Engine {
    dataset: Dataset,
    entity_types: Vec<String>,
    relation_types: Vec<String>,
    query: Query,
    layout: LayoutDriver,
    history: HistoryState,
    view: ViewController,
    clock: f64,
}

impl Engine {
    pub fn new(dataset: Dataset, config: LayoutConfig) -> Self {
        let mut engine = Self {
            entity_types: dataset.entity_types(),
            relation_types: dataset.relation_types(),
            dataset,
            query: Query::default(),
            layout: LayoutDriver::new(config),
            history: HistoryState::default(),
            view: ViewController::default(),
            clock: 0.0,
        };
        engine.refilter();
        engine
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    pub fn transform(&self) -> ViewTransform {
        self.view.transform()
    }

    pub fn layout(&self) -> &LayoutDriver {
        &self.layout
    }

    pub fn entity_types(&self) -> &[String] {
        &self.entity_types
    }

    pub fn relation_types(&self) -> &[String] {
        &self.relation_types
    }

    pub fn apply_all<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetSearchTerm(term) => {
                if self.query.search_term != term {
                    self.query.search_term = term;
                    self.refilter();
                }
            }
            Command::SetEntityTypeFilter(value) => {
                self.set_type_filter(TypeFilter::parse(&value), false);
            }
            Command::SetRelationTypeFilter(value) => {
                self.set_type_filter(TypeFilter::parse(&value), true);
            }
            Command::SelectNode(id) => self.dispatch(HistoryAction::Select(id)),
            Command::HistoryBack => self.dispatch(HistoryAction::Back),
            Command::HistoryForward => self.dispatch(HistoryAction::Forward),
            Command::ClearSelection => self.dispatch(HistoryAction::Clear),
            Command::ResetAll => self.reset(),
            Command::LoadDataset(dataset) => {
                self.entity_types = dataset.entity_types();
                self.relation_types = dataset.relation_types();
                self.dataset = dataset;
                self.reset();
            }
            Command::StartDrag(id) => self.start_drag(&id),
            Command::DragTo(position) => self.drag_to(position),
            Command::EndDrag => self.end_drag(),
            Command::ZoomPanTo(transform) => self.view.zoom_pan_to(transform),
            Command::ZoomAt { pointer, factor } => self.view.zoom_at(pointer, factor),
            Command::PanBy(delta) => self.view.pan_by(delta),
            Command::SetViewport(size) => {
                if size != self.view.viewport() {
                    self.view.set_viewport(size);
                    self.layout.set_center(self.view.viewport_center());
                }
            }
        }
    }

    fn set_type_filter(&mut self, value: TypeFilter, relation: bool) {
        let slot = if relation {
            &mut self.query.relation_type
        } else {
            &mut self.query.entity_type
        };
        if *slot != value {
            *slot = value;
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        // The dragged node belongs to the generation about to be discarded.
        if self.view.dragging().is_some() {
            self.view.end_drag(None);
        }

        let result = filter(&self.dataset, &self.query);
        self.layout.replace(result, self.view.viewport_center());
        tracing::info!(
            search = %self.query.search_term,
            entity_type = self.query.entity_type.label(),
            relation_type = self.query.relation_type.label(),
            nodes = self.layout.generation().nodes.len(),
            links = self.layout.generation().links.len(),
            "filter applied"
        );
    }

    fn reset(&mut self) {
        self.query = Query::default();
        self.history = reduce(&self.history, HistoryAction::Reset);
        self.view.reset();
        self.refilter();
    }

    fn dispatch(&mut self, action: HistoryAction) {
        let next = reduce(&self.history, action);
        if next == self.history {
            return;
        }

        let changed = next.selected() != self.history.selected();
        tracing::debug!(
            selected = next.selected().unwrap_or("-"),
            cursor = ?next.cursor(),
            depth = next.stack().len(),
            "history updated"
        );
        self.history = next;

        if changed && let Some(id) = self.history.selected() {
            match self.layout.generation().node(id) {
                Some(node) => self.view.recenter_on(node.world_pos(), self.clock),
                None => tracing::debug!(id, "selected node is not visible, not recentering"),
            }
        }
    }

    fn start_drag(&mut self, id: &str) {
        if self.view.dragging().is_some() {
            self.end_drag();
        }
        let Some(index) = self.layout.generation().index_of(id) else {
            return;
        };
        let node = &mut self.layout.generation_mut().nodes[index];
        self.view.start_drag(id, node);
        self.layout.reheat();
        tracing::debug!(id, "drag started");
    }

    fn drag_to(&mut self, position: Pos2) {
        let Some(index) = self
            .view
            .dragging()
            .and_then(|id| self.layout.generation().index_of(id))
        else {
            return;
        };
        let node = &mut self.layout.generation_mut().nodes[index];
        self.view.drag_to(position, node);
    }

    fn end_drag(&mut self) {
        let index = self
            .view
            .dragging()
            .and_then(|id| self.layout.generation().index_of(id));
        let node = match index {
            Some(index) => self.layout.generation_mut().nodes.get_mut(index),
            None => None,
        };
        if let Some(id) = self.view.end_drag(node) {
            self.layout.cool();
            tracing::debug!(id, "drag ended");
        }
    }

    pub fn frame(&mut self, now: f64) -> Frame {
        self.clock = now;
        let ticket = self.layout.schedule();
        let outcome = self.layout.tick(ticket);
        let animating = self.view.advance(now);
        let needs_repaint =
            outcome == TickOutcome::Moved || animating || self.view.dragging().is_some();

        frame::build_frame(
            self.layout.generation(),
            &self.history,
            self.view.transform(),
            needs_repaint,
        )
    }

    pub fn degree_counts(&self, id: &str) -> Option<DegreeCounts> {
        let generation = self.layout.generation();
        let index = generation.index_of(id)?;
        let mut counts = DegreeCounts::default();
        for link in &generation.links {
            if link.target == index {
                counts.inbound += 1;
            }
            if link.source == index {
                counts.outbound += 1;
            }
        }
        Some(counts)
    }

    pub fn search_suggestions(&self, limit: usize) -> Vec<Suggestion> {
        search::rank_suggestions(self.layout.generation(), &self.query.search_term, limit)
    }

    pub fn hit_test(&self, screen: Pos2) -> Option<&str> {
        let transform = self.view.transform();
        self.layout
            .generation()
            .nodes
            .iter()
            .rev()
            .find(|node| {
                let radius = (node.radius * transform.scale).max(MIN_HIT_RADIUS);
                transform.to_screen(node.world_pos()).distance(screen) <= radius
            })
            .map(|node| node.id.as_str())
    }

    pub fn pointer_pressed(&mut self, screen: Pos2) {
        let target = match self.hit_test(screen) {
            Some(id) => PressTarget::Node(id.to_owned()),
            None => PressTarget::Background,
        };
        self.view.gesture.press(target, screen);
    }

    pub fn pointer_moved(&mut self, screen: Pos2) {
        let events = self.view.gesture.motion(screen);
        self.apply_all(events.into_iter().map(Command::from));
    }

    pub fn pointer_released(&mut self) {
        let events = self.view.gesture.release();
        self.apply_all(events.into_iter().map(Command::from));
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::dataset::fixtures::{chain, people};

    fn engine(dataset: Dataset) -> Engine {
        let mut engine = Engine::new(dataset, LayoutConfig::default());
        engine.apply(Command::SetViewport(vec2(800.0, 600.0)));
        engine
    }

    fn settle(engine: &mut Engine) -> Frame {
        let mut now = 0.0;
        let mut frame = engine.frame(now);
        while frame.needs_repaint {
            now += 1.0 / 60.0;
            frame = engine.frame(now);
            assert!(now < 60.0, "engine never settled");
        }
        frame
    }

    fn screen_of(engine: &Engine, id: &str) -> Pos2 {
        let node = engine.layout().generation().node(id).expect("visible node");
        engine.transform().to_screen(node.world_pos())
    }

    #[test]
    fn chain_counts_inbound_and_outbound() {
        let engine = engine(chain());
        assert_eq!(
            engine.degree_counts("Y"),
            Some(DegreeCounts {
                inbound: 1,
                outbound: 1,
            })
        );
        assert_eq!(engine.layout().generation().node("Y").map(|n| n.degree), Some(2));
        assert_eq!(engine.layout().generation().node("X").map(|n| n.degree), Some(1));
        assert_eq!(engine.layout().generation().node("Z").map(|n| n.degree), Some(1));
        assert_eq!(engine.degree_counts("nobody"), None);
    }

    #[test]
    fn filter_change_replaces_generation_and_drops_stale_ticks() {
        let mut engine = engine(people());
        let stale = engine.layout.schedule();
        let before = engine.layout().generation().number;

        engine.apply(Command::SetSearchTerm("cats".to_owned()));
        let generation = engine.layout().generation();
        assert_eq!(generation.number, before + 1);
        assert_eq!(generation.nodes.len(), 1);
        let seeded = generation.nodes.clone();
        assert!(!engine.layout().is_running());

        assert_eq!(engine.layout.tick(stale), TickOutcome::Stale);
        assert_eq!(engine.layout().generation().nodes, seeded);
        assert!(!engine.frame(0.0).needs_repaint);
    }

    #[test]
    fn unchanged_query_keeps_generation() {
        let mut engine = engine(people());
        let before = engine.layout().generation().number;
        engine.apply(Command::SetSearchTerm(String::new()));
        engine.apply(Command::SetEntityTypeFilter("All".to_owned()));
        assert_eq!(engine.layout().generation().number, before);
    }

    #[test]
    fn empty_filter_result_is_tolerated() {
        let mut engine = engine(people());
        engine.apply(Command::SetSearchTerm("dogs".to_owned()));

        let frame = engine.frame(0.0);
        assert!(frame.nodes.is_empty());
        assert!(frame.links.is_empty());
        assert!(!frame.needs_repaint);

        engine.apply(Command::StartDrag("Alice".to_owned()));
        engine.apply(Command::DragTo(pos2(10.0, 10.0)));
        engine.apply(Command::EndDrag);
        engine.apply(Command::SelectNode("Alice".to_owned()));
        assert_eq!(engine.history().selected(), Some("Alice"));
        assert!(engine.hit_test(pos2(400.0, 300.0)).is_none());
    }

    #[test]
    fn selecting_recenters_without_rescaling() {
        let mut engine = engine(people());
        settle(&mut engine);
        engine.apply(Command::ZoomPanTo(ViewTransform::new(vec2(-50.0, 20.0), 1.5)));

        engine.apply(Command::SelectNode("Bob".to_owned()));
        let now = engine.clock + 1.0;
        engine.frame(now);

        assert_eq!(engine.transform().scale, 1.5);
        let centered = screen_of(&engine, "Bob");
        assert!((centered - pos2(400.0, 300.0)).length() < 1.0);
    }

    #[test]
    fn click_selects_and_background_click_clears() {
        let mut engine = engine(people());
        settle(&mut engine);

        let alice = screen_of(&engine, "Alice");
        engine.pointer_pressed(alice);
        engine.pointer_released();
        assert_eq!(engine.history().selected(), Some("Alice"));

        engine.pointer_pressed(pos2(-5_000.0, -5_000.0));
        engine.pointer_released();
        assert_eq!(engine.history().selected(), None);
        assert_eq!(engine.history().stack(), ["Alice"]);
    }

    #[test]
    fn dragging_pins_reheats_and_does_not_select() {
        let mut engine = engine(people());
        settle(&mut engine);
        assert!(!engine.layout().is_running());

        let bob = screen_of(&engine, "Bob");
        engine.pointer_pressed(bob);
        engine.pointer_moved(bob + vec2(40.0, 0.0));
        assert!(engine.layout().is_running());

        let target = engine.transform().to_world(bob + vec2(40.0, 0.0));
        engine.frame(100.0);
        let node = engine.layout().generation().node("Bob").expect("visible");
        assert_eq!(node.pin, Some(target));
        assert_eq!(node.position, Some(target));

        engine.pointer_released();
        let node = engine.layout().generation().node("Bob").expect("visible");
        assert_eq!(node.pin, None);
        assert_eq!(engine.history().selected(), None);
        assert!(engine.history().stack().is_empty());
    }

    #[test]
    fn second_drag_releases_the_first_pin() {
        let mut engine = engine(people());
        engine.apply_all([
            Command::StartDrag("Alice".to_owned()),
            Command::StartDrag("Bob".to_owned()),
            Command::DragTo(pos2(10.0, 10.0)),
            Command::EndDrag,
        ]);
        settle(&mut engine);

        let generation = engine.layout().generation();
        assert!(generation.nodes.iter().all(|node| node.pin.is_none()));
        assert_eq!(engine.view.dragging(), None);
    }

    #[test]
    fn filter_change_mid_drag_drops_the_drag() {
        let mut engine = engine(people());
        settle(&mut engine);
        engine.apply(Command::SelectNode("Acme".to_owned()));

        let bob = screen_of(&engine, "Bob");
        engine.pointer_pressed(bob);
        engine.pointer_moved(bob + vec2(30.0, 0.0));
        assert_eq!(engine.view.dragging(), Some("Bob"));

        engine.apply(Command::SetSearchTerm("bob".to_owned()));
        assert_eq!(engine.view.dragging(), None);

        engine.pointer_moved(bob + vec2(60.0, 0.0));
        engine.pointer_released();
        engine.frame(engine.clock + 1.0);

        let generation = engine.layout().generation();
        assert!(generation.node("Bob").is_some());
        assert!(generation.nodes.iter().all(|node| node.pin.is_none()));
        assert_eq!(engine.view.dragging(), None);
        assert_eq!(engine.history().selected(), Some("Acme"));
        assert_eq!(engine.history().stack(), ["Acme"]);
    }

    #[test]
    fn history_navigation_through_commands() {
        let mut engine = engine(people());
        engine.apply_all([
            Command::SelectNode("Alice".to_owned()),
            Command::SelectNode("Bob".to_owned()),
            Command::SelectNode("Acme".to_owned()),
            Command::HistoryBack,
            Command::SelectNode("Mallory".to_owned()),
        ]);
        assert_eq!(engine.history().stack(), ["Alice", "Bob", "Mallory"]);

        engine.apply(Command::HistoryBack);
        engine.apply(Command::HistoryForward);
        engine.apply(Command::HistoryForward);
        assert_eq!(engine.history().selected(), Some("Mallory"));
    }

    #[test]
    fn reset_all_restores_defaults() {
        let mut engine = engine(people());
        engine.apply_all([
            Command::SetSearchTerm("bob".to_owned()),
            Command::SetRelationTypeFilter("knows".to_owned()),
            Command::SelectNode("Bob".to_owned()),
            Command::ZoomAt {
                pointer: pos2(10.0, 10.0),
                factor: 3.0,
            },
        ]);

        engine.apply(Command::ResetAll);
        assert_eq!(engine.query(), &Query::default());
        assert_eq!(engine.history(), &HistoryState::default());
        assert_eq!(engine.transform(), ViewTransform::default());
        assert_eq!(engine.layout().generation().nodes.len(), 3);
    }

    #[test]
    fn loading_a_dataset_replaces_types_and_graph() {
        let mut engine = engine(people());
        engine.apply(Command::SelectNode("Alice".to_owned()));
        engine.apply(Command::LoadDataset(chain()));

        assert_eq!(engine.entity_types(), ["Thing"]);
        assert_eq!(engine.relation_types(), ["next"]);
        assert_eq!(engine.dataset().entities.len(), 3);
        assert_eq!(engine.history().selected(), None);
    }

    #[test]
    fn suggestions_follow_search_term() {
        let mut engine = engine(people());
        assert!(engine.search_suggestions(5).is_empty());

        engine.apply(Command::SetSearchTerm("a".to_owned()));
        let suggestions = engine.search_suggestions(5);
        assert!(!suggestions.is_empty());
        assert!(suggestions.iter().all(|suggestion| {
            engine.layout().generation().node(&suggestion.id).is_some()
        }));
    }
}
