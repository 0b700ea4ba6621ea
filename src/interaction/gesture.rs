use eframe::egui::{Pos2, Vec2};

const DRAG_THRESHOLD: f32 = 3.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PressTarget {
    Node(String),
    Background,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    SelectNode(String),
    ClearSelection,
    StartDrag(String),
    DragTo(Pos2),
    EndDrag,
    PanBy(Vec2),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerGesture {
    #[default]
    Idle,
    Pressed {
        target: PressTarget,
        origin: Pos2,
    },
    DraggingNode,
    Panning {
        last: Pos2,
    },
}

impl PointerGesture {
    pub fn press(&mut self, target: PressTarget, position: Pos2) {
        *self = Self::Pressed {
            target,
            origin: position,
        };
    }

    pub fn motion(&mut self, position: Pos2) -> Vec<GestureEvent> {
        match std::mem::take(self) {
            Self::Idle => Vec::new(),
            Self::Pressed { target, origin } => {
                if (position - origin).length() < DRAG_THRESHOLD {
                    *self = Self::Pressed { target, origin };
                    return Vec::new();
                }
                match target {
                    PressTarget::Node(id) => {
                        *self = Self::DraggingNode;
                        vec![GestureEvent::StartDrag(id), GestureEvent::DragTo(position)]
                    }
                    PressTarget::Background => {
                        *self = Self::Panning { last: position };
                        vec![GestureEvent::PanBy(position - origin)]
                    }
                }
            }
            Self::DraggingNode => {
                *self = Self::DraggingNode;
                vec![GestureEvent::DragTo(position)]
            }
            Self::Panning { last } => {
                *self = Self::Panning { last: position };
                vec![GestureEvent::PanBy(position - last)]
            }
        }
    }

    pub fn release(&mut self) -> Vec<GestureEvent> {
        match std::mem::take(self) {
            Self::Pressed {
                target: PressTarget::Node(id),
                ..
            } => vec![GestureEvent::SelectNode(id)],
            Self::Pressed {
                target: PressTarget::Background,
                ..
            } => vec![GestureEvent::ClearSelection],
            Self::DraggingNode => vec![GestureEvent::EndDrag],
            Self::Idle | Self::Panning { .. } => Vec::new(),
        }
    }
}
