//! Terminal presentation: an RGB pixel buffer rendered with half-block
//! characters, plus 3x5 bitmap glyphs for the score and overlay text.
//! The renderer reads [`crate::game::GameSession`] state and never feeds
//! anything back into the simulation.

use crate::config::SessionConfig;
use crate::game::{GameSession, Lifecycle};
use crossterm::{cursor, queue, style, style::Color as CColor};
use std::io::{self, Write};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const PLAYER_BODY: Rgb = Rgb(245, 200, 66);
const PLAYER_HI: Rgb = Rgb(255, 225, 100);
const AI_BODY: Rgb = Rgb(220, 60, 50);
const AI_HI: Rgb = Rgb(250, 110, 90);
const EYE: Rgb = Rgb(255, 255, 255);
const PUPIL: Rgb = Rgb(20, 20, 20);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(255, 215, 80);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Pixel buffer at double vertical resolution; each terminal cell shows
/// two stacked pixels via the upper-half-block glyph.
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if bg != Some(top) {
                        queue!(out, style::SetBackgroundColor(to_color(top)))?;
                        bg = Some(top);
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(to_color(top)))?;
                        fg = Some(top);
                    }
                    if bg != Some(bot) {
                        queue!(out, style::SetBackgroundColor(to_color(bot)))?;
                        bg = Some(bot);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn to_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// 3x5 bitmap glyphs for digits and the letters the overlays use.

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    if let Some(d) = ch.to_digit(10) {
        return Some(DIGITS[d as usize]);
    }
    Some(match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'D' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'F' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'I' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1],
        'N' => [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'Q' => [0,1,0, 1,0,1, 1,0,1, 0,1,0, 0,0,1],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'U' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'W' => [1,0,1, 1,0,1, 1,0,1, 1,1,1, 1,0,1],
        'Y' => [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0],
        _ => return None,
    })
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, bits: &[u8; 15], fg: Rgb, shadow: bool) {
    for row in 0..5 {
        for col in 0..3 {
            if bits[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                if shadow {
                    buf.set(px + 1, py + 1, SHADOW);
                }
                buf.set(px, py, fg);
            }
        }
    }
}

/// Draw `text` centered on `cx`; unknown characters and spaces advance
/// the cursor without marking pixels.
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let total_w = text.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(bits) = glyph(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, &bits, fg, true);
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), fg);
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// Maps the session's logical world onto the terminal pixel grid and
/// draws one frame of it.
pub struct Renderer {
    buf: PixelBuf,
    world_w: f64,
    world_h: f64,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16, config: &SessionConfig) -> Self {
        Self {
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            world_w: config.width,
            world_h: config.height,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.buf.resize(cols as usize, rows as usize * 2);
    }

    fn sx(&self) -> f64 {
        self.buf.w as f64 / self.world_w
    }

    fn sy(&self) -> f64 {
        self.buf.h as f64 / self.world_h
    }

    fn px(&self, x: f64) -> i32 {
        (x * self.sx()).round() as i32
    }

    fn py(&self, y: f64) -> i32 {
        (y * self.sy()).round() as i32
    }

    pub fn draw(&mut self, session: &GameSession, out: &mut impl Write) -> io::Result<()> {
        self.draw_sky();
        self.draw_pipe(session);
        if session.player.alive {
            let has_ai = session.ai.is_some();
            self.draw_bird(
                session.config.bird_x,
                session.player.y,
                session.config.bird_radius,
                PLAYER_BODY,
                PLAYER_HI,
                if has_ai { Some("YOU") } else { None },
            );
        }
        if let Some(ai) = &session.ai {
            if ai.alive {
                self.draw_bird(
                    session.ai_x(),
                    ai.y,
                    session.config.bird_radius,
                    AI_BODY,
                    AI_HI,
                    Some("AI"),
                );
            }
        }
        let cx = self.buf.w as i32 / 2;
        draw_number(&mut self.buf, cx, 3, session.score, WHITE);
        self.draw_overlay(session);
        self.buf.render(out)
    }

    fn draw_sky(&mut self) {
        for y in 0..self.buf.h {
            let t = ((y as u32 * 256) / self.buf.h.max(1) as u32) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            for x in 0..self.buf.w {
                self.buf.set(x as i32, y as i32, c);
            }
        }
    }

    fn draw_pipe(&mut self, session: &GameSession) {
        let left = self.px(session.pipe.x);
        let width = (session.config.pipe_width * self.sx()).round().max(2.0) as i32;
        let gap_top = self.py(session.pipe.gap_top);
        let gap_bot = self.py(session.gap_bottom());
        let cap_h = 2;
        let cap_extra = 1;

        // Bodies.
        for x in 0..width {
            let c = pipe_shade(x, width);
            for y in 0..(gap_top - cap_h) {
                self.buf.set(left + x, y, c);
            }
            for y in (gap_bot + cap_h)..self.buf.h as i32 {
                self.buf.set(left + x, y, c);
            }
        }
        // Caps overhang the body by one pixel on each side.
        for x in -cap_extra..(width + cap_extra) {
            let c = pipe_shade(x + cap_extra, width + cap_extra * 2);
            for y in (gap_top - cap_h)..gap_top {
                self.buf.set(left + x, y, c);
            }
            for y in gap_bot..(gap_bot + cap_h) {
                self.buf.set(left + x, y, c);
            }
            self.buf.set(left + x, gap_top - 1, CAP_DARK);
            self.buf.set(left + x, gap_bot, CAP_DARK);
        }
    }

    fn draw_bird(&mut self, x: f64, y: f64, radius: f64, body: Rgb, highlight: Rgb, label: Option<&str>) {
        let cx = self.px(x);
        let cy = self.py(y);
        let rx = ((radius * self.sx()).round() as i32).max(1);
        let ry = ((radius * self.sy()).round() as i32).max(1);

        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let nx = dx as f64 / rx as f64;
                let ny = dy as f64 / ry as f64;
                if nx * nx + ny * ny <= 1.0 {
                    // Lighter crown on the upper third.
                    let c = if ny < -0.4 { highlight } else { body };
                    self.buf.set(cx + dx, cy + dy, c);
                }
            }
        }
        // Eye, looking forward.
        self.buf.set(cx + rx / 2, cy - ry / 3, EYE);
        self.buf.set(cx + rx / 2 + 1, cy - ry / 3, PUPIL);

        if let Some(label) = label {
            draw_text(&mut self.buf, cx, cy - ry - 7, label, WHITE);
        }
    }

    fn draw_overlay(&mut self, session: &GameSession) {
        let cx = self.buf.w as i32 / 2;
        let cy = self.buf.h as i32 / 2;
        match session.lifecycle {
            Lifecycle::NotStarted => {
                draw_text(&mut self.buf, cx, cy - 14, "FLAPPY DUEL", GOLD);
                draw_text(&mut self.buf, cx, cy, "SPACE TO START", WHITE);
                draw_text(&mut self.buf, cx, cy + 8, "P PAUSE R RESTART Q QUIT", WHITE);
            }
            Lifecycle::Paused => {
                draw_text(&mut self.buf, cx, cy, "PAUSED", WHITE);
            }
            Lifecycle::Ended => {
                self.dim();
                let verdict = match (&session.ai, session.player.alive) {
                    (None, _) => "GAME OVER",
                    (Some(ai), true) if !ai.alive => "YOU WIN",
                    (Some(ai), false) if ai.alive => "AI WINS",
                    _ => "DRAW",
                };
                draw_text(&mut self.buf, cx, cy - 8, verdict, GOLD);
                draw_number(&mut self.buf, cx, cy, session.score, WHITE);
                if session.config.start_gated {
                    draw_text(&mut self.buf, cx, cy + 8, "SPACE TO RESTART", WHITE);
                }
            }
            Lifecycle::Running => {}
        }
    }

    fn dim(&mut self) {
        for y in 0..self.buf.h {
            for x in 0..self.buf.w {
                let c = self.buf.get(x, y);
                self.buf.set(x as i32, y as i32, Rgb(c.0 / 2, c.1 / 2, c.2 / 2));
            }
        }
    }
}
