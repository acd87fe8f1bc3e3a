//! Controller tests against an in-memory page.

use std::collections::HashMap;

use super::*;
use crate::geometry::Viewport;

const PAGE_URL: &str = "https://example.com/feed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ElementId(usize);

#[derive(Debug, Clone)]
struct FakeNode {
    kind: ElementKind,
    bounds: Size,
    natural: Size,
    src: Option<String>,
    poster: Option<String>,
    background: Option<String>,
    children: Vec<ElementId>,
    attributes: HashMap<String, String>,
    link: Option<String>,
    in_preview: bool,
}

impl FakeNode {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            bounds: Size::new(200.0, 150.0),
            natural: Size::default(),
            src: None,
            poster: None,
            background: None,
            children: Vec::new(),
            attributes: HashMap::new(),
            link: None,
            in_preview: false,
        }
    }

    fn image(src: &str, natural: Size) -> Self {
        Self {
            src: Some(src.to_string()),
            natural,
            ..Self::new(ElementKind::Image)
        }
    }

    fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds = Size::new(width, height);
        self
    }

    fn with_background(mut self, css: &str) -> Self {
        self.background = Some(css.to_string());
        self
    }

    fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(LoadRequest),
    Resize(Size),
    Move(Point),
    Reveal,
    Conceal,
    Notify(String),
    Schedule(u32),
    Cancel(u32),
}

struct FakePage {
    viewport: Viewport,
    nodes: Vec<FakeNode>,
    calls: Vec<Call>,
    next_timer: u32,
    fail_loads: bool,
}

impl FakePage {
    fn new() -> Self {
        Self {
            viewport: Viewport::new(1000.0, 800.0),
            nodes: Vec::new(),
            calls: Vec::new(),
            next_timer: 1,
            fail_loads: false,
        }
    }

    fn add(&mut self, node: FakeNode) -> ElementId {
        self.nodes.push(node);
        ElementId(self.nodes.len() - 1)
    }

    fn add_child(&mut self, parent: ElementId, node: FakeNode) -> ElementId {
        let child = self.add(node);
        self.nodes[parent.0].children.push(child);
        child
    }

    fn node(&self, id: &ElementId) -> &FakeNode {
        &self.nodes[id.0]
    }

    fn loads(&self) -> Vec<&LoadRequest> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Load(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn count(&self, expected: &Call) -> usize {
        self.calls.iter().filter(|call| *call == expected).count()
    }

    fn last_move(&self) -> Option<Point> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Move(point) => Some(*point),
            _ => None,
        })
    }
}

impl HostPage for FakePage {
    type Element = ElementId;
    type Timer = u32;
    type Error = String;

    fn document_url(&self) -> String {
        PAGE_URL.to_string()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn element_kind(&self, element: &ElementId) -> ElementKind {
        self.node(element).kind
    }

    fn bounding_size(&self, element: &ElementId) -> Size {
        self.node(element).bounds
    }

    fn natural_size(&self, element: &ElementId) -> Size {
        self.node(element).natural
    }

    fn image_source(&self, element: &ElementId) -> Option<String> {
        self.node(element).src.clone()
    }

    fn poster(&self, element: &ElementId) -> Option<String> {
        self.node(element).poster.clone()
    }

    fn background_image(&self, element: &ElementId) -> Option<String> {
        self.node(element).background.clone()
    }

    fn children(&self, element: &ElementId) -> Vec<ElementId> {
        self.node(element).children.clone()
    }

    fn attribute(&self, element: &ElementId, name: &str) -> Option<String> {
        self.node(element).attributes.get(name).cloned()
    }

    fn enclosing_link_href(&self, element: &ElementId) -> Option<String> {
        self.node(element).link.clone()
    }

    fn is_within_preview(&self, element: &ElementId) -> bool {
        self.node(element).in_preview
    }

    fn begin_preview_load(&mut self, request: &LoadRequest) -> Result<(), String> {
        if self.fail_loads {
            return Err("document has no body".to_string());
        }
        self.calls.push(Call::Load(request.clone()));
        Ok(())
    }

    fn resize_preview(&mut self, size: Size) -> Result<(), String> {
        self.calls.push(Call::Resize(size));
        Ok(())
    }

    fn move_preview(&mut self, position: Point) -> Result<(), String> {
        self.calls.push(Call::Move(position));
        Ok(())
    }

    fn reveal_preview(&mut self) -> Result<(), String> {
        self.calls.push(Call::Reveal);
        Ok(())
    }

    fn conceal_preview(&mut self) -> Result<(), String> {
        self.calls.push(Call::Conceal);
        Ok(())
    }

    fn show_notification(&mut self, message: &str) -> Result<(), String> {
        self.calls.push(Call::Notify(message.to_string()));
        Ok(())
    }

    fn schedule_notification_hide(&mut self, after_ms: u32) -> Result<u32, String> {
        self.calls.push(Call::Schedule(after_ms));
        let timer = self.next_timer;
        self.next_timer += 1;
        Ok(timer)
    }

    fn cancel_timer(&mut self, timer: u32) {
        self.calls.push(Call::Cancel(timer));
    }
}

fn controller() -> PreviewController<FakePage> {
    PreviewController::new(HoverZoomConfig::default(), Locale::English)
}

fn ctrl_q() -> KeyInput {
    KeyInput::new(true, "q", "KeyQ")
}

const POINTER: Point = Point::new(100.0, 100.0);

#[test]
fn test_twitter_image_resolves_to_original() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image(
        "https://pbs.twimg.com/media/abc?name=small",
        Size::new(120.0, 80.0),
    ));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);

    assert_eq!(controller.phase(), PreviewPhase::Loading);
    assert_eq!(controller.tracked_element(), Some(&img));
    assert_eq!(
        controller.tracked_url(),
        Some("https://pbs.twimg.com/media/abc?name=small")
    );
    let loads = page.loads();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].src, "https://pbs.twimg.com/media/abc?name=orig");
    assert_eq!(loads[0].fallback, "https://pbs.twimg.com/media/abc?name=small");
    assert_eq!(loads[0].generation, controller.generation());
}

#[test]
fn test_placeholder_uses_natural_size_for_images() {
    let mut page = FakePage::new();
    let img = page.add(
        FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)).with_bounds(50.0, 40.0),
    );
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);

    assert_eq!(page.calls[0], Call::Resize(Size::new(150.0, 120.0)));
    assert_eq!(page.calls[1], Call::Move(Point::new(115.0, 115.0)));
    assert_eq!(controller.preview_size(), Size::new(150.0, 120.0));
}

#[test]
fn test_placeholder_uses_rendered_size_for_backgrounds() {
    let mut page = FakePage::new();
    let div = page.add(
        FakeNode::new(ElementKind::Other)
            .with_bounds(40.0, 60.0)
            .with_background(r#"url("https://example.com/bg.png")"#),
    );
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &div, POINTER);

    assert_eq!(page.calls[0], Call::Resize(Size::new(60.0, 90.0)));
    assert_eq!(page.loads()[0].src, "https://example.com/bg.png");
}

#[test]
fn test_decode_success_sizes_and_reveals() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(2000.0, 1000.0));

    assert_eq!(controller.phase(), PreviewPhase::Shown);
    assert_eq!(controller.preview_size(), Size::new(800.0, 400.0));
    assert!(page.calls.contains(&Call::Resize(Size::new(800.0, 400.0))));
    assert_eq!(page.calls.last(), Some(&Call::Reveal));
}

#[test]
fn test_decode_success_positions_against_latest_pointer() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    controller.handle_mouse_move(&mut page, &img, Point::new(140.0, 130.0));
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 100.0));

    assert_eq!(page.last_move(), Some(Point::new(155.0, 145.0)));
}

#[test]
fn test_element_without_image_is_a_no_op() {
    let mut page = FakePage::new();
    let div = page.add(FakeNode::new(ElementKind::Other).with_background("none"));
    page.add_child(div, FakeNode::new(ElementKind::Other));
    let mut controller = controller();
    let generation = controller.generation();

    controller.handle_mouse_over(&mut page, &div, POINTER);

    assert!(page.calls.is_empty());
    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(controller.generation(), generation);
    assert_eq!(controller.tracked_element(), None);
    assert_eq!(controller.tracked_url(), None);
}

#[test]
fn test_inactive_controller_ignores_hover() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let config = HoverZoomConfig {
        active_on_start: false,
        ..HoverZoomConfig::default()
    };
    let mut controller = PreviewController::new(config, Locale::English);

    controller.handle_mouse_over(&mut page, &img, POINTER);

    assert!(page.calls.is_empty());
    assert_eq!(controller.phase(), PreviewPhase::Hidden);
}

#[test]
fn test_small_targets_are_ignored() {
    let mut page = FakePage::new();
    let narrow = page.add(
        FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)).with_bounds(29.0, 300.0),
    );
    let short = page.add(
        FakeNode::image("https://example.com/b.jpg", Size::new(100.0, 80.0)).with_bounds(300.0, 10.0),
    );
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &narrow, POINTER);
    controller.handle_mouse_over(&mut page, &short, POINTER);

    assert!(page.calls.is_empty());
}

#[test]
fn test_preview_does_not_trigger_itself() {
    let mut page = FakePage::new();
    let mut node = FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0));
    node.in_preview = true;
    let preview_img = page.add(node);
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &preview_img, POINTER);

    assert!(page.calls.is_empty());
}

#[test]
fn test_disallowed_candidates_abort_hover() {
    let mut page = FakePage::new();
    let data_img = page.add(FakeNode::image(
        "data:image/png;base64,iVBORw0KGgo=",
        Size::new(100.0, 80.0),
    ));
    let empty_img = page.add(FakeNode::image("", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &data_img, POINTER);
    controller.handle_mouse_over(&mut page, &empty_img, POINTER);

    assert!(page.calls.is_empty());
    assert_eq!(controller.phase(), PreviewPhase::Hidden);
}

#[test]
fn test_video_poster_is_used() {
    let mut page = FakePage::new();
    let mut node = FakeNode::new(ElementKind::Video).with_bounds(320.0, 180.0);
    node.poster = Some("/posters/clip.jpg".to_string());
    let video = page.add(node);
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &video, POINTER);

    assert_eq!(page.loads()[0].src, "/posters/clip.jpg");
    assert_eq!(controller.tracked_url(), Some("/posters/clip.jpg"));
}

#[test]
fn test_video_without_poster_is_ignored() {
    let mut page = FakePage::new();
    let video = page.add(FakeNode::new(ElementKind::Video).with_background(r#"url("https://example.com/x.png")"#));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &video, POINTER);

    assert!(page.calls.is_empty());
}

#[test]
fn test_child_background_supplies_candidate_and_attributes() {
    let mut page = FakePage::new();
    let card = page.add(FakeNode::new(ElementKind::Other));
    page.add_child(card, FakeNode::new(ElementKind::Other));
    page.add_child(
        card,
        FakeNode::new(ElementKind::Other)
            .with_background(r#"url("https://example.com/thumb.jpg")"#)
            .with_attribute("data-full-src", "https://example.com/full.jpg"),
    );
    page.add_child(
        card,
        FakeNode::new(ElementKind::Other).with_background(r#"url("https://example.com/later.jpg")"#),
    );
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &card, POINTER);

    let loads = page.loads();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].src, "https://example.com/full.jpg");
    assert_eq!(loads[0].fallback, "https://example.com/thumb.jpg");
    assert_eq!(controller.tracked_element(), Some(&card));
}

#[test]
fn test_own_background_wins_over_children() {
    let mut page = FakePage::new();
    let card = page.add(
        FakeNode::new(ElementKind::Other).with_background(r#"url('https://example.com/own.jpg')"#),
    );
    page.add_child(
        card,
        FakeNode::new(ElementKind::Other).with_background(r#"url("https://example.com/child.jpg")"#),
    );
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &card, POINTER);

    assert_eq!(page.loads()[0].src, "https://example.com/own.jpg");
}

#[test]
fn test_failed_decode_retries_thumbnail_once_then_hides() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image(
        "https://pbs.twimg.com/media/abc?name=small",
        Size::new(120.0, 80.0),
    ));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();

    controller.handle_decode_failure(&mut page, generation);
    assert_eq!(controller.phase(), PreviewPhase::Loading);
    assert_eq!(
        controller.loading_src(),
        Some("https://pbs.twimg.com/media/abc?name=small")
    );
    let loads = page.loads();
    assert_eq!(loads.len(), 2);
    assert_eq!(loads[1].src, "https://pbs.twimg.com/media/abc?name=small");
    assert_eq!(loads[1].generation, generation);

    controller.handle_decode_failure(&mut page, generation);
    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(page.loads().len(), 2);
    assert_eq!(page.count(&Call::Conceal), 1);
    assert_eq!(controller.tracked_element(), None);
}

#[test]
fn test_retry_can_succeed() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image(
        "https://wx1.sinaimg.cn/mw690/0001.jpg",
        Size::new(120.0, 80.0),
    ));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    assert_eq!(page.loads()[0].src, "https://wx1.sinaimg.cn/large/0001.jpg");
    let generation = controller.generation();

    controller.handle_decode_failure(&mut page, generation);
    controller.handle_decode_success(&mut page, generation, Size::new(690.0, 460.0));

    assert_eq!(controller.phase(), PreviewPhase::Shown);
    assert_eq!(page.count(&Call::Reveal), 1);
}

#[test]
fn test_failure_without_distinct_fallback_hides_immediately() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_failure(&mut page, generation);

    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(page.loads().len(), 1);
}

#[test]
fn test_superseded_decode_callbacks_are_ignored() {
    let mut page = FakePage::new();
    let first = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let second = page.add(FakeNode::image("https://example.com/b.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &first, POINTER);
    let stale = controller.generation();
    controller.handle_mouse_over(&mut page, &second, POINTER);
    let current = controller.generation();
    assert!(current > stale);

    controller.handle_decode_success(&mut page, stale, Size::new(50.0, 50.0));
    controller.handle_decode_failure(&mut page, stale);
    assert_eq!(controller.phase(), PreviewPhase::Loading);
    assert_eq!(controller.tracked_element(), Some(&second));
    assert_eq!(page.count(&Call::Reveal), 0);
    assert_eq!(page.count(&Call::Conceal), 0);

    controller.handle_decode_success(&mut page, current, Size::new(50.0, 50.0));
    assert_eq!(controller.phase(), PreviewPhase::Shown);
}

#[test]
fn test_decode_after_hide_is_ignored() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_mouse_out(&mut page, &img, None);
    controller.handle_decode_success(&mut page, generation, Size::new(50.0, 50.0));

    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(page.count(&Call::Reveal), 0);
}

#[test]
fn test_degenerate_decode_uses_placeholder() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/icon.svg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(0.0, 0.0));

    assert_eq!(controller.phase(), PreviewPhase::Shown);
    assert_eq!(controller.preview_size(), Size::new(300.0, 225.0));
}

#[test]
fn test_host_failure_while_loading_hides() {
    let mut page = FakePage::new();
    page.fail_loads = true;
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);

    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(controller.tracked_element(), None);
    assert_eq!(page.count(&Call::Conceal), 1);
}

#[test]
fn test_toggle_shortcut_flips_and_notifies() {
    let mut page = FakePage::new();
    let mut controller = controller();

    let outcome = controller.handle_key(&mut page, &ctrl_q());

    assert_eq!(outcome, KeyOutcome::Toggled { active: false });
    assert!(!controller.is_active());
    assert_eq!(
        page.calls,
        vec![
            Call::Notify("Image hover zoom disabled".to_string()),
            Call::Schedule(2000),
        ]
    );
}

#[test]
fn test_repeated_toggle_resets_notification_timer() {
    let mut page = FakePage::new();
    let mut controller = controller();

    controller.handle_key(&mut page, &ctrl_q());
    controller.handle_key(&mut page, &KeyInput::new(true, "Q", "KeyQ"));

    assert!(controller.is_active());
    assert_eq!(
        page.calls,
        vec![
            Call::Notify("Image hover zoom disabled".to_string()),
            Call::Schedule(2000),
            Call::Cancel(1),
            Call::Notify("Image hover zoom enabled".to_string()),
            Call::Schedule(2000),
        ]
    );
}

#[test]
fn test_expired_notification_timer_is_not_cancelled() {
    let mut page = FakePage::new();
    let mut controller = controller();

    controller.handle_key(&mut page, &ctrl_q());
    controller.notification_expired();
    controller.handle_key(&mut page, &ctrl_q());

    assert_eq!(page.count(&Call::Cancel(1)), 0);
}

#[test]
fn test_other_keys_are_ignored() {
    let mut page = FakePage::new();
    let mut controller = controller();

    assert_eq!(
        controller.handle_key(&mut page, &KeyInput::new(false, "q", "KeyQ")),
        KeyOutcome::Ignored
    );
    assert_eq!(
        controller.handle_key(&mut page, &KeyInput::new(true, "s", "KeyS")),
        KeyOutcome::Ignored
    );
    assert!(controller.is_active());
    assert!(page.calls.is_empty());
}

#[test]
fn test_double_toggle_hides_visible_preview_without_restoring() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 80.0));
    assert_eq!(controller.phase(), PreviewPhase::Shown);

    controller.handle_key(&mut page, &ctrl_q());
    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(page.count(&Call::Conceal), 1);

    controller.handle_key(&mut page, &ctrl_q());
    assert!(controller.is_active());
    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(page.count(&Call::Reveal), 1);
}

#[test]
fn test_deactivating_while_loading_drops_pending_decode() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_key(&mut page, &ctrl_q());
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 80.0));

    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(page.count(&Call::Reveal), 0);
}

#[test]
fn test_chinese_locale_messages() {
    let mut page = FakePage::new();
    let mut controller: PreviewController<FakePage> =
        PreviewController::new(HoverZoomConfig::default(), Locale::Chinese);

    controller.toggle(&mut page);

    assert_eq!(page.calls[0], Call::Notify("图片悬浮放大功能已关闭".to_string()));
}

#[test]
fn test_configured_locale_overrides_detected() {
    let mut page = FakePage::new();
    let config = HoverZoomConfig {
        locale: Some(Locale::English),
        ..HoverZoomConfig::default()
    };
    let mut controller: PreviewController<FakePage> = PreviewController::new(config, Locale::Chinese);

    controller.toggle(&mut page);

    assert_eq!(page.calls[0], Call::Notify("Image hover zoom disabled".to_string()));
}

#[test]
fn test_mouse_out_of_tracked_element_hides() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let elsewhere = page.add(FakeNode::new(ElementKind::Other));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    controller.handle_mouse_out(&mut page, &img, Some(&elsewhere));

    assert_eq!(controller.phase(), PreviewPhase::Hidden);
    assert_eq!(controller.tracked_element(), None);
    assert_eq!(controller.tracked_url(), None);
    assert_eq!(page.count(&Call::Conceal), 1);
}

#[test]
fn test_mouse_out_into_preview_keeps_it() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut preview = FakeNode::new(ElementKind::Other);
    preview.in_preview = true;
    let preview = page.add(preview);
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    controller.handle_mouse_out(&mut page, &img, Some(&preview));

    assert_eq!(controller.phase(), PreviewPhase::Loading);
    assert_eq!(page.count(&Call::Conceal), 0);
}

#[test]
fn test_mouse_out_of_preview_to_page_hides() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut preview = FakeNode::new(ElementKind::Other);
    preview.in_preview = true;
    let preview = page.add(preview);
    let elsewhere = page.add(FakeNode::new(ElementKind::Other));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    controller.handle_mouse_out(&mut page, &preview, Some(&elsewhere));

    assert_eq!(controller.phase(), PreviewPhase::Hidden);
}

#[test]
fn test_mouse_out_of_unrelated_element_is_ignored() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let other = page.add(FakeNode::new(ElementKind::Other));
    let mut controller = controller();

    controller.handle_mouse_out(&mut page, &other, None);
    assert!(page.calls.is_empty());

    controller.handle_mouse_over(&mut page, &img, POINTER);
    controller.handle_mouse_out(&mut page, &other, Some(&img));
    assert_eq!(controller.phase(), PreviewPhase::Loading);
}

#[test]
fn test_mouse_move_repositions_only_once_revealed() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let moves_before = page.calls.len();
    controller.handle_mouse_move(&mut page, &img, Point::new(120.0, 120.0));
    assert_eq!(page.calls.len(), moves_before);

    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 100.0));
    controller.handle_mouse_move(&mut page, &img, Point::new(300.0, 200.0));

    assert_eq!(page.calls.last(), Some(&Call::Move(Point::new(315.0, 215.0))));
}

#[test]
fn test_mouse_move_follows_revealed_preview_while_next_image_loads() {
    let mut page = FakePage::new();
    let first = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let second = page.add(FakeNode::image("https://example.com/b.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &first, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 100.0));
    controller.handle_mouse_over(&mut page, &second, POINTER);
    assert_eq!(controller.phase(), PreviewPhase::Loading);
    assert!(controller.is_revealed());

    controller.handle_mouse_move(&mut page, &second, Point::new(400.0, 300.0));

    // 150x120 placeholder of the second image follows the pointer
    assert_eq!(page.count(&Call::Conceal), 0);
    assert_eq!(page.calls.last(), Some(&Call::Move(Point::new(415.0, 315.0))));
}

#[test]
fn test_hide_clears_revealed() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 100.0));
    controller.handle_mouse_out(&mut page, &img, None);
    assert!(!controller.is_revealed());

    let calls_before = page.calls.len();
    controller.handle_mouse_move(&mut page, &img, Point::new(300.0, 200.0));
    assert_eq!(page.calls.len(), calls_before);
}

#[test]
fn test_mouse_move_near_edge_flips_preview() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(200.0, 100.0));
    controller.handle_mouse_move(&mut page, &img, Point::new(950.0, 780.0));

    // 300x150 preview flips left of and above the pointer
    assert_eq!(page.last_move(), Some(Point::new(635.0, 615.0)));
}

#[test]
fn test_mouse_move_over_preview_does_not_reposition() {
    let mut page = FakePage::new();
    let img = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let mut preview = FakeNode::new(ElementKind::Other);
    preview.in_preview = true;
    let preview = page.add(preview);
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);
    let generation = controller.generation();
    controller.handle_decode_success(&mut page, generation, Size::new(100.0, 100.0));
    let calls_before = page.calls.len();
    controller.handle_mouse_move(&mut page, &preview, Point::new(130.0, 130.0));

    assert_eq!(page.calls.len(), calls_before);
}

#[test]
fn test_new_hover_supersedes_tracked_element() {
    let mut page = FakePage::new();
    let first = page.add(FakeNode::image("https://example.com/a.jpg", Size::new(100.0, 80.0)));
    let second = page.add(FakeNode::image("https://example.com/b.jpg", Size::new(100.0, 80.0)));
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &first, POINTER);
    controller.handle_mouse_over(&mut page, &second, POINTER);

    assert_eq!(controller.tracked_element(), Some(&second));
    assert_eq!(controller.tracked_url(), Some("https://example.com/b.jpg"));
    assert_eq!(page.count(&Call::Conceal), 0);
    assert_eq!(page.loads().len(), 2);
}

#[test]
fn test_link_target_used_for_linked_thumbnail() {
    let mut page = FakePage::new();
    let mut node = FakeNode::image("https://example.com/t/42.jpg", Size::new(100.0, 80.0));
    node.link = Some("https://example.com/photos/42.png".to_string());
    let img = page.add(node);
    let mut controller = controller();

    controller.handle_mouse_over(&mut page, &img, POINTER);

    assert_eq!(page.loads()[0].src, "https://example.com/photos/42.png");
}
