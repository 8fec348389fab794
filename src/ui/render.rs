use image::RgbaImage;

use crate::config::Color;
use crate::ui::layout::Rect;

// 5x7 bitmap font for printable ASCII (32..=126). One byte per row, top row
// first; bit 4 is the leftmost column.
const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

static GLYPHS: [[u8; 7]; 95] = [
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000], // space
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100], // !
    [0b01010, 0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000], // "
    [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010], // #
    [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100], // $
    [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011], // %
    [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101], // &
    [0b01100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000], // '
    [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010], // (
    [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000], // )
    [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000], // *
    [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000], // +
    [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000], // ,
    [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000], // -
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100], // .
    [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000], // /
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
    [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000], // :
    [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b00100, 0b01000], // ;
    [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010], // <
    [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000], // =
    [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000], // >
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100], // ?
    [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110], // @
    [0b01110, 0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
    [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110], // [
    [0b00000, 0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00000], // backslash
    [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110], // ]
    [0b00100, 0b01010, 0b10001, 0b00000, 0b00000, 0b00000, 0b00000], // ^
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111], // _
    [0b01000, 0b00100, 0b00010, 0b00000, 0b00000, 0b00000, 0b00000], // `
    [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111], // a
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110], // b
    [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110], // c
    [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111], // d
    [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110], // e
    [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000], // f
    [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110], // g
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001], // h
    [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110], // i
    [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100], // j
    [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010], // k
    [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // l
    [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001], // m
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001], // n
    [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110], // o
    [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000], // p
    [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001], // q
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000], // r
    [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110], // s
    [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110], // t
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101], // u
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // v
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010], // w
    [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001], // x
    [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110], // y
    [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111], // z
    [0b00010, 0b00100, 0b00100, 0b01000, 0b00100, 0b00100, 0b00010], // {
    [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // |
    [0b01000, 0b00100, 0b00100, 0b00010, 0b00100, 0b00100, 0b01000], // }
    [0b00000, 0b00000, 0b00000, 0b01101, 0b10010, 0b00000, 0b00000], // ~
];

/// Pack RGB into softbuffer's 0x00RRGGBB format.
pub fn rgb(c: Color) -> u32 {
    (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32
}

fn unpack(v: u32) -> Color {
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}

fn blend(dst: u32, src: Color, alpha: u8) -> u32 {
    let a = alpha as u32;
    let d = unpack(dst);
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
    rgb([mix(src[0], d[0]), mix(src[1], d[1]), mix(src[2], d[2])])
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        0
    } else {
        n * (GLYPH_W + 1) * scale - scale
    }
}

pub fn text_height(scale: u32) -> u32 {
    GLYPH_H * scale
}

// ---------------------------------------------------------------------------
// Canvas over a softbuffer frame
// ---------------------------------------------------------------------------

pub struct Canvas<'a> {
    buf: &'a mut [u32],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u32], width: u32, height: u32) -> Self {
        debug_assert!(buf.len() >= (width as usize) * (height as usize));
        Self { buf, width, height }
    }

    pub fn clear(&mut self, color: Color) {
        self.buf.fill(rgb(color));
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_rect_raw(rect, rgb(color));
    }

    /// One-pixel outline; `light` on the top/left edges, `dark` on the others.
    pub fn bevel_rect(&mut self, rect: Rect, light: Color, dark: Color) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1), light);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.height), light);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1), dark);
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.height), dark);
    }

    /// Draw a string and return the x position after the last glyph.
    /// Characters outside printable ASCII render as '?'.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32, color: Color) -> i32 {
        let mut pen = x;
        for ch in text.chars() {
            let code = if (' '..='~').contains(&ch) { ch } else { '?' };
            self.draw_glyph(&GLYPHS[code as usize - 32], pen, y, scale, color);
            pen += ((GLYPH_W + 1) * scale) as i32;
        }
        pen
    }

    /// Draw `text` centered inside `rect`.
    pub fn draw_text_centered(&mut self, text: &str, rect: Rect, scale: u32, color: Color) {
        let x = rect.x as i32 + (rect.width as i32 - text_width(text, scale) as i32) / 2;
        let y = rect.y as i32 + (rect.height as i32 - text_height(scale) as i32) / 2;
        self.draw_text(text, x, y, scale, color);
    }

    fn draw_glyph(&mut self, glyph: &[u8; 7], x: i32, y: i32, scale: u32, color: Color) {
        let px = rgb(color);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0b10000 >> col) == 0 {
                    continue;
                }
                let cell = Rect::from_signed(
                    x + (col * scale) as i32,
                    y + (row as u32 * scale) as i32,
                    scale,
                    scale,
                );
                if let Some(r) = cell {
                    self.fill_rect_raw(r, px);
                }
            }
        }
    }

    fn fill_rect_raw(&mut self, rect: Rect, px: u32) {
        let Some(r) = rect.intersect(&self.bounds()) else { return };
        for y in r.y..r.bottom() {
            let start = self.offset(r.x, y);
            self.buf[start..start + r.width as usize].fill(px);
        }
    }

    /// Copy an RGBA bitmap with its top-left corner at (x, y), clipped to
    /// `clip`. Translucent pixels are blended over what is already there.
    pub fn blit(&mut self, src: &RgbaImage, x: u32, y: u32, clip: Rect) {
        let dest = Rect::new(x, y, src.width(), src.height());
        let Some(visible) = dest.intersect(&clip).and_then(|r| r.intersect(&self.bounds())) else {
            return;
        };
        for dy in visible.y..visible.bottom() {
            let sy = dy - y;
            for dx in visible.x..visible.right() {
                let p = src.get_pixel(dx - x, sy).0;
                let off = self.offset(dx, dy);
                let under = self.buf[off];
                self.buf[off] = match p[3] {
                    255 => rgb([p[0], p[1], p[2]]),
                    0 => continue,
                    a => blend(under, [p[0], p[1], p[2]], a),
                };
            }
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.buf[self.offset(x, y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn rgb_packs_channels() {
        assert_eq!(rgb([0x12, 0x34, 0x56]), 0x00123456);
        assert_eq!(unpack(0x00abcdef), [0xab, 0xcd, 0xef]);
    }

    #[test]
    fn fill_rect_is_clipped_to_frame() {
        let mut buf = vec![0u32; 10 * 10];
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        canvas.fill_rect(Rect::new(8, 8, 5, 5), [255, 0, 0]);
        assert_eq!(canvas.pixel(9, 9), 0x00ff0000);
        assert_eq!(canvas.pixel(7, 7), 0);
    }

    #[test]
    fn text_width_matches_glyph_advance() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("AB", 2), 22);
    }

    #[test]
    fn draw_text_advances_and_paints() {
        let mut buf = vec![0u32; 40 * 10];
        let mut canvas = Canvas::new(&mut buf, 40, 10);
        let end = canvas.draw_text("I", 0, 0, 1, [255, 255, 255]);
        assert_eq!(end, 6);
        // 'I' has its stem in the middle column.
        assert_eq!(canvas.pixel(2, 3), 0x00ffffff);
        assert_eq!(canvas.pixel(0, 3), 0);
    }

    #[test]
    fn blit_respects_clip_and_alpha() {
        let mut buf = vec![rgb([0, 0, 0]); 8 * 8];
        let mut canvas = Canvas::new(&mut buf, 8, 8);
        let mut src = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        src.put_pixel(1, 1, Rgba([255, 255, 255, 0]));
        canvas.blit(&src, 2, 2, Rect::new(0, 0, 5, 5));

        assert_eq!(canvas.pixel(2, 2), 0x00ffffff);
        assert_eq!(canvas.pixel(3, 3), 0, "transparent pixel kept background");
        assert_eq!(canvas.pixel(5, 5), 0, "outside clip");
    }
}
