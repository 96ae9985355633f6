use serde::{Deserialize, Serialize};

use crate::ui::Rect;

/// Per-frame pointer input, cleared by the app loop after each redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiInput {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
}

/// A declarative list of UI nodes rebuilt every frame.
///
/// The tree carries no behavior: hit-testing turns pointer input into the
/// caller's action type, and rendering walks the nodes in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Button(ButtonNode<A>),
    Text(TextNode),
    Panel(PanelNode),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonNode<A> {
    pub id: u32,
    pub rect: Rect,
    pub label: String,
    pub action: A,
    pub enabled: bool,
    /// Toggle buttons render differently while their option is on.
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextNode {
    pub pos: (u32, u32),
    pub text: String,
    pub scale: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelNode {
    pub rect: Rect,
}

/// Actions for every enabled button under a mouse-up, topmost first.
pub fn hit_test_actions<A: Clone>(view: &ViewTree<A>, input: UiInput) -> Vec<A> {
    if !input.mouse_up {
        return Vec::new();
    }
    let Some((mx, my)) = input.mouse_pos else {
        return Vec::new();
    };
    let mut actions = Vec::new();
    for node in view.nodes.iter().rev() {
        if let ViewNode::Button(button) = node {
            if button.enabled && button.rect.contains(mx, my) {
                actions.push(button.action.clone());
            }
        }
    }
    actions
}

/// The id of the topmost enabled button under the pointer, for hover styling.
pub fn hovered_button<A>(view: &ViewTree<A>, mouse_pos: Option<(u32, u32)>) -> Option<u32> {
    let (mx, my) = mouse_pos?;
    view.nodes.iter().rev().find_map(|node| match node {
        ViewNode::Button(button) if button.enabled && button.rect.contains(mx, my) => {
            Some(button.id)
        }
        _ => None,
    })
}
