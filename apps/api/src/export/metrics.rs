//! Static Helvetica width tables and the greedy word-wrap used by the PDF formatter.
//!
//! Widths are in em units (AFM widths / 1000) for ASCII 0x20..=0x7E, indexed by
//! `(char as usize) - 32`. The PDF uses the standard-14 Helvetica faces, so no font file is
//! embedded and these tables are the only metrics the layout needs.

/// The two faces the PDF formatter writes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Helvetica,
    HelveticaBold,
}

impl Face {
    /// PostScript name of the standard-14 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Face::Helvetica => "Helvetica",
            Face::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> &'static FontMetricTable {
        match self {
            Face::Helvetica => &HELVETICA_TABLE,
            Face::HelveticaBold => &HELVETICA_BOLD_TABLE,
        }
    }
}

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Width of U+2022 (bullet), present in WinAnsi at 0x95.
    bullet_width: f32,
    /// Fallback for anything else outside ASCII.
    average_char_width: f32,
}

impl FontMetricTable {
    /// Width of `s` in points at `font_size`.
    pub fn measure(&self, s: &str, font_size: f32) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum::<f32>() * font_size
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '\u{2022}' {
            self.bullet_width
        } else {
            self.average_char_width
        }
    }

    /// Greedy word-wrap of one logical line into physical lines no wider than `max_width` points.
    ///
    /// Runs of whitespace collapse to a single space. A word wider than the line on its own is
    /// split at character boundaries. Blank input yields no lines.
    pub fn wrap(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let space_w = self.char_width(' ') * font_size;
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            for piece in self.split_oversized(word, font_size, max_width) {
                let piece_w = self.measure(&piece, font_size);
                if current.is_empty() {
                    current = piece;
                    current_width = piece_w;
                } else if current_width + space_w + piece_w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current = piece;
                    current_width = piece_w;
                } else {
                    current.push(' ');
                    current.push_str(&piece);
                    current_width += space_w + piece_w;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Breaks a single word into chunks that each fit on a line.
    fn split_oversized(&self, word: &str, font_size: f32, max_width: f32) -> Vec<String> {
        if self.measure(word, font_size) <= max_width {
            return vec![word.to_string()];
        }
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut width = 0.0_f32;
        for c in word.chars() {
            let w = self.char_width(c) * font_size;
            if !piece.is_empty() && width + w > max_width {
                pieces.push(std::mem::take(&mut piece));
                width = 0.0;
            }
            piece.push(c);
            width += w;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.611,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
