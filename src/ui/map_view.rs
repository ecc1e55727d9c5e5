use imgui::{Condition, MouseButton, StyleColor, Ui};

use crate::core::geo::TILE_SIZE;
use crate::core::{GeoBounds, GeoPoint};
use crate::projection::FrameView;

pub const MIN_ZOOM: f32 = 3.0;
pub const MAX_ZOOM: f32 = 20.0;

const PATH_COLOR: [f32; 4] = [0.13, 0.35, 0.95, 1.0];
const MARKER_COLOR: [f32; 4] = [0.13, 0.59, 0.95, 1.0];
const GRID_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 0.15];
const MARKER_SIZE: f32 = 25.0;

/// Maps geographic points onto a canvas centred on one point
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    center_world: [f64; 2],
    zoom: f64,
    canvas_center: [f32; 2],
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f32, canvas_center: [f32; 2]) -> Self {
        Self {
            center_world: center.to_world_pixels(zoom as f64),
            zoom: zoom as f64,
            canvas_center,
        }
    }

    /// Shift the view by a screen-space offset
    pub fn panned(mut self, offset: [f64; 2]) -> Self {
        self.center_world[0] += offset[0];
        self.center_world[1] += offset[1];
        self
    }

    pub fn to_screen(&self, point: GeoPoint) -> [f32; 2] {
        let world = point.to_world_pixels(self.zoom);
        [
            self.canvas_center[0] + (world[0] - self.center_world[0]) as f32,
            self.canvas_center[1] + (world[1] - self.center_world[1]) as f32,
        ]
    }

    /// Screen offset of the tile grid, for drawing grid lines that pan with the map
    fn grid_phase(&self) -> [f32; 2] {
        let tile = self.tile_size();
        [
            (self.canvas_center[0] as f64 - self.center_world[0]).rem_euclid(tile) as f32,
            (self.canvas_center[1] as f64 - self.center_world[1]).rem_euclid(tile) as f32,
        ]
    }

    /// On-screen tile size; tiles grow between integer zoom levels
    fn tile_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom - self.zoom.floor())
    }
}

/// Outline of the aircraft marker as two triangles sharing the tail notch.
///
/// The shape points north at heading 0 and turns clockwise with heading.
pub fn marker_triangles(center: [f32; 2], heading: f64, size: f32) -> [[[f32; 2]; 3]; 2] {
    // Arrow from a 24x24 icon, relative to its centre
    let scale = size / 24.0;
    let tip = [0.0, -10.0];
    let left = [-7.5, 8.29];
    let notch = [0.0, 6.0];
    let right = [7.5, 8.29];

    let (sin, cos) = (heading.to_radians() as f32).sin_cos();
    let place = |p: [f32; 2]| {
        let x = p[0] * scale;
        let y = p[1] * scale;
        [center[0] + x * cos - y * sin, center[1] + x * sin + y * cos]
    };

    [
        [place(tip), place(left), place(notch)],
        [place(tip), place(notch), place(right)],
    ]
}

/// The "Map" window: full flight path plus the heading-aware marker
pub struct MapView {
    zoom: f32,
    follow: bool,
    /// Manual pan in screen pixels, used when not following
    pan: [f64; 2],
    /// Overrides the home point after "Centre on track"
    focus: Option<GeoPoint>,
}

impl MapView {
    pub fn new(zoom: f32, follow: bool) -> Self {
        Self {
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            follow,
            pan: [0.0, 0.0],
            focus: None,
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn render(
        &mut self,
        ui: &Ui,
        frame: &FrameView,
        home: GeoPoint,
        bounds: Option<GeoBounds>,
        is_open: &mut bool,
    ) {
        ui.window("Map")
            .size([900.0, 560.0], Condition::FirstUseEver)
            .position([10.0, 30.0], Condition::FirstUseEver)
            .opened(is_open)
            .build(|| {
                self.render_toolbar(ui, bounds);
                self.render_canvas(ui, frame, home);
            });
    }

    fn render_toolbar(&mut self, ui: &Ui, bounds: Option<GeoBounds>) {
        if ui.checkbox("Follow aircraft", &mut self.follow) && self.follow {
            self.pan = [0.0, 0.0];
            self.focus = None;
        }
        ui.same_line();
        if let Some(bounds) = bounds {
            if ui.small_button("Centre on track") {
                self.centre_on(bounds);
            }
        }
        ui.same_line();
        if ui.small_button("-") {
            self.set_zoom(self.zoom - 1.0);
        }
        ui.same_line();
        ui.text(format!("Zoom {:.1}", self.zoom));
        ui.same_line();
        if ui.small_button("+") {
            self.set_zoom(self.zoom + 1.0);
        }
    }

    /// Stop following and look at the middle of the track
    pub fn centre_on(&mut self, bounds: GeoBounds) {
        self.follow = false;
        self.pan = [0.0, 0.0];
        self.focus = Some(bounds.center());
    }

    /// Map centre for this frame
    pub fn view_center(&self, frame: &FrameView, home: GeoPoint) -> GeoPoint {
        if self.follow {
            frame.position
        } else {
            self.focus.unwrap_or(home)
        }
    }

    fn render_canvas(&mut self, ui: &Ui, frame: &FrameView, home: GeoPoint) {
        let avail = ui.content_region_avail();
        let size = [avail[0].max(100.0), avail[1].max(100.0)];
        let pos_min = ui.cursor_screen_pos();
        let pos_max = [pos_min[0] + size[0], pos_min[1] + size[1]];
        let canvas_center = [pos_min[0] + size[0] / 2.0, pos_min[1] + size[1] / 2.0];

        // Input first so this frame's zoom and pan are already applied
        ui.invisible_button("map_canvas", size);
        if ui.is_item_hovered() {
            let wheel = ui.io().mouse_wheel;
            if wheel != 0.0 {
                self.set_zoom(self.zoom + wheel * 0.5);
            }
        }
        if !self.follow && ui.is_item_active() && ui.is_mouse_dragging(MouseButton::Left) {
            let delta = ui.io().mouse_delta;
            self.pan[0] -= delta[0] as f64;
            self.pan[1] -= delta[1] as f64;
        }

        let center = self.view_center(frame, home);
        let viewport = Viewport::new(center, self.zoom, canvas_center).panned(self.pan);

        let draw_list = ui.get_window_draw_list();
        draw_list
            .add_rect(pos_min, pos_max, ui.style_color(StyleColor::FrameBg))
            .filled(true)
            .build();

        draw_list.with_clip_rect_intersect(pos_min, pos_max, || {
            let tile = viewport.tile_size() as f32;
            let phase = viewport.grid_phase();
            let mut x = pos_min[0] + (phase[0] - pos_min[0]).rem_euclid(tile);
            while x < pos_max[0] {
                draw_list.add_line([x, pos_min[1]], [x, pos_max[1]], GRID_COLOR).build();
                x += tile;
            }
            let mut y = pos_min[1] + (phase[1] - pos_min[1]).rem_euclid(tile);
            while y < pos_max[1] {
                draw_list.add_line([pos_min[0], y], [pos_max[0], y], GRID_COLOR).build();
                y += tile;
            }

            let points: Vec<[f32; 2]> = frame.path.iter().map(|&p| viewport.to_screen(p)).collect();
            match points.len() {
                0 => {}
                1 => {
                    draw_list.add_circle(points[0], 3.0, PATH_COLOR).filled(true).build();
                }
                _ => {
                    draw_list.add_polyline(points, PATH_COLOR).thickness(3.0).build();
                }
            }

            if frame.has_sample {
                let at = viewport.to_screen(frame.position);
                for [a, b, c] in marker_triangles(at, frame.heading, MARKER_SIZE) {
                    draw_list.add_triangle(a, b, c, MARKER_COLOR).filled(true).build();
                }
            }

            let mut readout = format!("{:.7}, {:.7}", frame.position.lat, frame.position.lon);
            if let Some(alt) = frame.altitude {
                readout.push_str(&format!("  {:.1} m", alt));
            }
            draw_list.add_text([pos_min[0] + 6.0, pos_max[1] - 18.0], [0.8, 0.8, 0.8, 0.9], readout);
        });
    }
}
