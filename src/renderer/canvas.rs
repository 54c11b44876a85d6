//! Canvas 2D backend
//!
//! Replays scene draw commands on a `CanvasRenderingContext2d`. Drawing errors
//! are logged and the rest of the frame still renders.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{DrawCmd, Fill, RAINBOW_STOPS, TextAlign};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Draw every command in order
    pub fn render(&self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            if let Err(e) = self.draw(cmd) {
                log::warn!("Draw error: {:?}", e);
            }
        }
    }

    fn draw(&self, cmd: &DrawCmd) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Rect { pos, size, fill } => {
                let (x, y) = (f64::from(pos.x), f64::from(pos.y));
                let (w, h) = (f64::from(size.x), f64::from(size.y));
                match fill {
                    Fill::Solid(color) => ctx.set_fill_style_str(&color.to_hex()),
                    Fill::Rainbow => {
                        let gradient = ctx.create_linear_gradient(x, y, x + w, y);
                        for (offset, color) in RAINBOW_STOPS {
                            gradient.add_color_stop(offset, &color.to_hex())?;
                        }
                        ctx.set_fill_style_canvas_gradient(&gradient);
                    }
                }
                ctx.fill_rect(x, y, w, h);
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(*radius),
                    0.0,
                    TAU,
                )?;
                ctx.set_fill_style_str(&color.to_hex());
                ctx.fill();
            }
            DrawCmd::Text {
                text,
                pos,
                size,
                color,
                align,
            } => {
                ctx.set_font(&format!("{size}px Arial"));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.set_fill_style_str(&color.to_hex());
                ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y))?;
            }
            DrawCmd::Shade { alpha } => {
                ctx.set_fill_style_str(&format!("rgba(0, 0, 0, {alpha})"));
                ctx.fill_rect(
                    0.0,
                    0.0,
                    f64::from(CANVAS_WIDTH),
                    f64::from(CANVAS_HEIGHT),
                );
            }
        }
        Ok(())
    }
}
