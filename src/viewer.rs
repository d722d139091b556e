//! Per-session reader state for one issue's page list: paging, zoom, pan,
//! fullscreen, and gesture recognition. Pure state, no I/O; the transport
//! layer feeds it discrete events and reads the resulting state back.
//!
//! Gestures are tracked as an explicit recognizer state (idle / swiping /
//! pinching / panning) so interrupted drags and two-finger-to-one-finger
//! transitions stay well-defined.

use serde::Serialize;

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 3.0;
/// Minimum horizontal displacement, in pixels, for a swipe to navigate.
pub const SWIPE_THRESHOLD: f32 = 50.0;
/// Zoom change per pixel of pinch spread or wheel travel.
pub const ZOOM_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub x: f32,
    pub y: f32,
}

impl Touch {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(a: Touch, b: Touch) -> f32 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    /// Single-touch horizontal swipe candidate, only entered at zoom 1.
    Swiping { start_x: f32, last_x: f32 },
    /// Two simultaneous touch points; zoom follows inter-frame distance.
    Pinching { last_distance: f32 },
    /// Single-touch drag-to-pan, only entered while zoomed in.
    Panning { origin: Touch, start_pan: (f32, f32) },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    F,
    Escape,
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    page_count: usize,
    current_page: usize,
    zoom: f32,
    pan: (f32, f32),
    container: (f32, f32),
    fullscreen: bool,
    zoomed_panel: bool,
    loading: bool,
    gesture: Gesture,
}

impl ViewerState {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            current_page: 0,
            zoom: MIN_ZOOM,
            pan: (0.0, 0.0),
            container: (0.0, 0.0),
            fullscreen: false,
            zoomed_panel: false,
            loading: page_count > 0,
            gesture: Gesture::Idle,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        self.pan
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_zoomed_panel(&self) -> bool {
        self.zoomed_panel
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Pages to opportunistically prefetch: current ± 1, within bounds.
    pub fn prefetch_targets(&self) -> Vec<usize> {
        let mut targets = Vec::with_capacity(2);
        if self.page_count == 0 {
            return targets;
        }
        if self.current_page > 0 {
            targets.push(self.current_page - 1);
        }
        if self.current_page + 1 < self.page_count {
            targets.push(self.current_page + 1);
        }
        targets
    }

    pub fn set_container(&mut self, width: f32, height: f32) {
        self.container = (width, height);
        self.pan = self.clamp_pan(self.pan);
    }

    /// Jump to `page` if it is in bounds. Every page change resets zoom and
    /// pan and raises the loading flag until the new image reports in.
    pub fn go_to(&mut self, page: usize) {
        if page >= self.page_count || page == self.current_page {
            return;
        }
        self.current_page = page;
        self.zoom = MIN_ZOOM;
        self.pan = (0.0, 0.0);
        self.loading = true;
    }

    /// Advance one page; no-op (not wraparound) at the last page.
    pub fn next(&mut self) {
        if self.current_page + 1 < self.page_count {
            self.go_to(self.current_page + 1);
        }
    }

    /// Go back one page; no-op at the first page.
    pub fn prev(&mut self) {
        if self.current_page > 0 {
            self.go_to(self.current_page - 1);
        }
    }

    pub fn image_loaded(&mut self) {
        self.loading = false;
    }

    pub fn touch_start(&mut self, touches: &[Touch]) {
        self.gesture = match touches {
            [a, b] => Gesture::Pinching {
                last_distance: Touch::distance(*a, *b),
            },
            [t] if self.zoom > MIN_ZOOM => Gesture::Panning {
                origin: *t,
                start_pan: self.pan,
            },
            [t] => Gesture::Swiping {
                start_x: t.x,
                last_x: t.x,
            },
            _ => Gesture::Idle,
        };
    }

    pub fn touch_move(&mut self, touches: &[Touch]) {
        match (self.gesture, touches) {
            (Gesture::Pinching { last_distance }, [a, b]) => {
                let distance = Touch::distance(*a, *b);
                self.apply_zoom((distance - last_distance) * ZOOM_STEP);
                self.gesture = Gesture::Pinching {
                    last_distance: distance,
                };
            }
            (Gesture::Swiping { start_x, .. }, [t]) => {
                self.gesture = Gesture::Swiping {
                    start_x,
                    last_x: t.x,
                };
            }
            (Gesture::Panning { origin, start_pan }, [t]) => {
                self.pan = self.clamp_pan((
                    start_pan.0 + (t.x - origin.x),
                    start_pan.1 + (t.y - origin.y),
                ));
            }
            // Finger count changed mid-gesture: re-recognize from scratch.
            _ => self.touch_start(touches),
        }
    }

    /// End of a touch sequence. A completed swipe past the threshold
    /// navigates; anything else returns to idle without side effects.
    pub fn touch_end(&mut self) {
        if let Gesture::Swiping { start_x, last_x } = self.gesture {
            let dx = last_x - start_x;
            // Swipes only navigate at zoom 1 and past the 50px threshold.
            if self.zoom <= MIN_ZOOM && dx.abs() > SWIPE_THRESHOLD {
                if dx < 0.0 {
                    self.next();
                } else {
                    self.prev();
                }
            }
        }
        self.gesture = Gesture::Idle;
    }

    /// Wheel zoom, active only with ctrl/cmd held.
    pub fn wheel(&mut self, delta_y: f32, modifier: bool) {
        if modifier {
            self.apply_zoom(-delta_y * ZOOM_STEP);
        }
    }

    /// Toggle the inline zoomed panel. Only meaningful at zoom 1.
    pub fn toggle_zoomed_panel(&mut self) {
        if self.zoom <= MIN_ZOOM {
            self.zoomed_panel = !self.zoomed_panel;
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_changed(!self.fullscreen);
    }

    /// Fullscreen state changed, whether we requested it or the platform
    /// did (e.g. Escape). Zoom and pan reset either way.
    pub fn fullscreen_changed(&mut self, active: bool) {
        self.fullscreen = active;
        self.zoom = MIN_ZOOM;
        self.pan = (0.0, 0.0);
    }

    pub fn key(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::F => self.toggle_fullscreen(),
            Key::Escape => {
                if self.fullscreen {
                    self.fullscreen_changed(false);
                }
                self.zoomed_panel = false;
            }
        }
    }

    fn apply_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        // Shrinking the zoom shrinks the pan bounds with it.
        self.pan = self.clamp_pan(self.pan);
    }

    /// The image never pans past its own edge: each axis is bounded by
    /// `container * (zoom - 1) / 2`.
    fn clamp_pan(&self, pan: (f32, f32)) -> (f32, f32) {
        let max_x = self.container.0 * (self.zoom - MIN_ZOOM) / 2.0;
        let max_y = self.container.1 * (self.zoom - MIN_ZOOM) / 2.0;
        (pan.0.clamp(-max_x, max_x), pan.1.clamp(-max_y, max_y))
    }
}

/// Initial viewer state shipped with an issue-detail response so the client
/// can render page 1 and start prefetching before any interaction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewerBootstrap {
    pub page_count: usize,
    pub start_page: usize,
    pub prefetch: Vec<usize>,
}

impl ViewerBootstrap {
    pub fn for_pages(page_count: usize) -> Self {
        let state = ViewerState::new(page_count);
        Self {
            page_count,
            start_page: state.current_page(),
            prefetch: state.prefetch_targets(),
        }
    }
}
