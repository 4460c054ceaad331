//! The race HUD: FPS overlay, driver panel, pit and quit buttons

use std::time::Duration;

use kart_ui::prelude::*;
use kart_ui::term::{Control, FrameInfo};
use tracing::{debug, info, warn};

const OVERLAY_TEXT: Rgba = Rgba::rgb(255, 215, 0);
const NOTICE_BACKGROUND: Rgba = Rgba::new(0, 0, 0, 200);
const NOTICE_TIME: Duration = Duration::from_secs(3);

pub struct Hud {
    counter: FrameCounter,
    pit: NodeId,
    quit: NodeId,
    confirm: NodeId,
    pending_quit: Option<DialogHandle>,
}

impl Hud {
    pub fn new(ui: &mut UiRoot) -> Result<Self, UiError> {
        let theme = ui.config().theme.clone();
        let tree = ui.tree_mut();

        let mut counter = FrameCounter::new().with_paddings(Point::new(1, 0), Point::new(1, 0));
        let lines = counter.format(tree, OVERLAY_TEXT)?;
        let overlay = tree.insert_stack_panel(None);
        tree.add_range(overlay, HorizontalAnchor::Left, &lines)?;

        let title = tree.insert(Component::text("Driver", theme.title, Point::new(2, 1)));
        let name = tree.insert_text_box("", theme.text_box, Rect::new(2, 1, 20, 1), HorizontalAnchor::None);
        let pit = tree.insert_button("Pit stop", theme.dialog_ok, Rect::new(2, 1, 20, 1), HorizontalAnchor::None);
        let quit = tree.insert_button("Quit", theme.dialog_cancel, Rect::new(2, 1, 20, 1), HorizontalAnchor::None);
        let panel = tree.insert_panel();
        tree.node_mut(panel)?.component.h_anchor = HorizontalAnchor::Right;
        tree.set_margin(panel, Point::new(-1, 1))?;
        tree.add_range(panel, HorizontalAnchor::Left, &[title, name, pit, quit])?;

        let confirm = tree.insert_panel();
        tree.create_dialog(confirm, "Leave the race?", HorizontalAnchor::Center, false, &[])?;

        ui.add(overlay)?;
        ui.add(panel)?;
        ui.show_notification("Type a name, Enter to register", NOTICE_BACKGROUND, Rgba::WHITE, NOTICE_TIME)?;

        Ok(Self {
            counter,
            pit,
            quit,
            confirm,
            pending_quit: None,
        })
    }

    pub fn on_frame(&mut self, ui: &mut UiRoot, events: Vec<UiEvent>, info: FrameInfo) -> Control {
        self.counter.update(info.delta);
        if let Err(e) = self.counter.format(ui.tree_mut(), OVERLAY_TEXT) {
            warn!(error = %e, "fps overlay update failed");
        }

        for event in events {
            match event.kind {
                UiEventKind::Clicked if event.source == self.pit => {
                    notify(ui, "Pit crew standing by".to_string());
                }
                UiEventKind::Clicked if event.source == self.quit => self.confirm_quit(ui),
                UiEventKind::TextAccepted(name) if !name.is_empty() => {
                    info!(driver = %name, "driver registered");
                    notify(ui, format!("Driver: {}", name));
                }
                _ => {}
            }
        }

        let Some(handle) = self.pending_quit.as_mut() else {
            return Control::Continue;
        };
        match handle.try_result() {
            Some(DialogResult::Accepted) => {
                info!(frames = info.frame, "quit confirmed");
                Control::Quit
            }
            Some(result) => {
                debug!(?result, "quit dismissed");
                self.pending_quit = None;
                Control::Continue
            }
            None => Control::Continue,
        }
    }

    fn confirm_quit(&mut self, ui: &mut UiRoot) {
        if ui.tree().is_dialog_open(self.confirm) {
            return;
        }
        match ui.tree_mut().show_as_dialog(self.confirm) {
            Ok(handle) => self.pending_quit = Some(handle),
            Err(e) => warn!(error = %e, "unable to show quit dialog"),
        }
    }
}

fn notify(ui: &mut UiRoot, text: String) {
    if let Err(e) = ui.show_notification(text, NOTICE_BACKGROUND, Rgba::WHITE, NOTICE_TIME) {
        warn!(error = %e, "notification failed");
    }
}
