//! Static keymap and modifier tables
//!
//! US layout, PS/2 Scan Code Set 1.
//!
//! Every table has 256 entries. Indices 0x00..=0x7F are primary make codes;
//! indices 0x80..=0xFF are the extended (0xE0-prefixed) make codes, which the
//! decoder forms by setting bit 7 on the byte that follows the prefix.
//!
//! A character entry of [`NO`] means the key produces no character.

use input_types::{ctrl, LockKeys, Modifiers, SpecialKey};

/// Scan codes referenced by the decoder and its callers
pub mod scancode {
    /// Prefix byte announcing an extended key
    pub const EXTENDED_PREFIX: u8 = 0xE0;
    /// Bit set on break (key release) codes
    pub const RELEASE_BIT: u8 = 0x80;

    pub const ESCAPE: u8 = 0x01;
    pub const BACKSPACE: u8 = 0x0E;
    pub const ENTER: u8 = 0x1C;
    pub const LEFT_CTRL: u8 = 0x1D;
    pub const A: u8 = 0x1E;
    pub const LEFT_SHIFT: u8 = 0x2A;
    pub const C: u8 = 0x2E;
    pub const SLASH: u8 = 0x35;
    pub const RIGHT_SHIFT: u8 = 0x36;
    pub const LEFT_ALT: u8 = 0x38;
    pub const SPACE: u8 = 0x39;
    pub const CAPS_LOCK: u8 = 0x3A;
    pub const NUM_LOCK: u8 = 0x45;
    pub const SCROLL_LOCK: u8 = 0x46;
    pub const KEYPAD_8: u8 = 0x48;

    /// Returns the break code for a primary make code
    pub const fn release(code: u8) -> u8 {
        code | RELEASE_BIT
    }
}

/// No character
pub const NO: u8 = 0;

const HOME: u8 = SpecialKey::Home.code();
const END: u8 = SpecialKey::End.code();
const UP: u8 = SpecialKey::Up.code();
const DOWN: u8 = SpecialKey::Down.code();
const LEFT: u8 = SpecialKey::Left.code();
const RIGHT: u8 = SpecialKey::Right.code();
const PAGE_UP: u8 = SpecialKey::PageUp.code();
const PAGE_DOWN: u8 = SpecialKey::PageDown.code();
const INSERT: u8 = SpecialKey::Insert.code();
const DELETE: u8 = SpecialKey::Delete.code();

#[rustfmt::skip]
const NORMAL_PRIMARY: [u8; 0x58] = [
    NO,    0x1B,  b'1',  b'2',  b'3',  b'4',  b'5',  b'6',  // 0x00
    b'7',  b'8',  b'9',  b'0',  b'-',  b'=',  0x08,  b'\t',
    b'q',  b'w',  b'e',  b'r',  b't',  b'y',  b'u',  b'i',  // 0x10
    b'o',  b'p',  b'[',  b']',  b'\n', NO,    b'a',  b's',
    b'd',  b'f',  b'g',  b'h',  b'j',  b'k',  b'l',  b';',  // 0x20
    b'\'', b'`',  NO,    b'\\', b'z',  b'x',  b'c',  b'v',
    b'b',  b'n',  b'm',  b',',  b'.',  b'/',  NO,    b'*',  // 0x30
    NO,    b' ',  NO,    NO,    NO,    NO,    NO,    NO,
    NO,    NO,    NO,    NO,    NO,    NO,    NO,    b'7',  // 0x40
    b'8',  b'9',  b'-',  b'4',  b'5',  b'6',  b'+',  b'1',
    b'2',  b'3',  b'0',  b'.',  NO,    NO,    NO,    NO,    // 0x50
];

#[rustfmt::skip]
const SHIFT_PRIMARY: [u8; 0x58] = [
    NO,    0x1B,  b'!',  b'@',  b'#',  b'$',  b'%',  b'^',  // 0x00
    b'&',  b'*',  b'(',  b')',  b'_',  b'+',  0x08,  b'\t',
    b'Q',  b'W',  b'E',  b'R',  b'T',  b'Y',  b'U',  b'I',  // 0x10
    b'O',  b'P',  b'{',  b'}',  b'\n', NO,    b'A',  b'S',
    b'D',  b'F',  b'G',  b'H',  b'J',  b'K',  b'L',  b':',  // 0x20
    b'"',  b'~',  NO,    b'|',  b'Z',  b'X',  b'C',  b'V',
    b'B',  b'N',  b'M',  b'<',  b'>',  b'?',  NO,    b'*',  // 0x30
    NO,    b' ',  NO,    NO,    NO,    NO,    NO,    NO,
    NO,    NO,    NO,    NO,    NO,    NO,    NO,    b'7',  // 0x40
    b'8',  b'9',  b'-',  b'4',  b'5',  b'6',  b'+',  b'1',
    b'2',  b'3',  b'0',  b'.',  NO,    NO,    NO,    NO,    // 0x50
];

#[rustfmt::skip]
const CTRL_PRIMARY: [u8; 0x38] = [
    NO,         NO,         NO,         NO,         NO,         NO,         NO,         NO,         // 0x00
    NO,         NO,         NO,         NO,         NO,         NO,         NO,         NO,
    ctrl(b'Q'), ctrl(b'W'), ctrl(b'E'), ctrl(b'R'), ctrl(b'T'), ctrl(b'Y'), ctrl(b'U'), ctrl(b'I'), // 0x10
    ctrl(b'O'), ctrl(b'P'), NO,         NO,         b'\r',      NO,         ctrl(b'A'), ctrl(b'S'),
    ctrl(b'D'), ctrl(b'F'), ctrl(b'G'), ctrl(b'H'), ctrl(b'J'), ctrl(b'K'), ctrl(b'L'), NO,         // 0x20
    NO,         NO,         NO,         ctrl(b'\\'),ctrl(b'Z'), ctrl(b'X'), ctrl(b'C'), ctrl(b'V'),
    ctrl(b'B'), ctrl(b'N'), ctrl(b'M'), NO,         NO,         ctrl(b'/'), NO,         NO,         // 0x30
];

/// Navigation cluster, identical in every table
const NAVIGATION: [(u8, u8); 10] = [
    // Home sends E0 47. xv6 kbd.h lists it at 0x97 (E0 17) instead.
    (0xC7, HOME),
    (0xC8, UP),
    (0xC9, PAGE_UP),
    (0xCB, LEFT),
    (0xCD, RIGHT),
    (0xCF, END),
    (0xD0, DOWN),
    (0xD1, PAGE_DOWN),
    (0xD2, INSERT),
    (0xD3, DELETE),
];

// Keypad Enter and keypad divide.
const KEYPAD_EXTENDED: [(u8, u8); 2] = [(0x9C, b'\n'), (0xB5, b'/')];
const KEYPAD_EXTENDED_CTRL: [(u8, u8); 2] = [(0x9C, b'\r'), (0xB5, ctrl(b'/'))];

const fn build_map(primary: &[u8], keypad: &[(u8, u8)]) -> [u8; 256] {
    let mut map = [NO; 256];
    let mut i = 0;
    while i < primary.len() {
        map[i] = primary[i];
        i += 1;
    }
    let mut i = 0;
    while i < keypad.len() {
        map[keypad[i].0 as usize] = keypad[i].1;
        i += 1;
    }
    let mut i = 0;
    while i < NAVIGATION.len() {
        map[NAVIGATION[i].0 as usize] = NAVIGATION[i].1;
        i += 1;
    }
    map
}

const fn build_shift_codes() -> [Modifiers; 256] {
    let mut codes = [Modifiers::NONE; 256];
    codes[scancode::LEFT_CTRL as usize] = Modifiers::CTRL;
    codes[scancode::LEFT_SHIFT as usize] = Modifiers::SHIFT;
    codes[scancode::RIGHT_SHIFT as usize] = Modifiers::SHIFT;
    codes[scancode::LEFT_ALT as usize] = Modifiers::ALT;
    // Right ctrl and right alt arrive as E0 1D / E0 38.
    codes[scancode::release(scancode::LEFT_CTRL) as usize] = Modifiers::CTRL;
    codes[scancode::release(scancode::LEFT_ALT) as usize] = Modifiers::ALT;
    codes
}

const fn build_toggle_codes() -> [LockKeys; 256] {
    let mut codes = [LockKeys::NONE; 256];
    codes[scancode::CAPS_LOCK as usize] = LockKeys::CAPS_LOCK;
    codes[scancode::NUM_LOCK as usize] = LockKeys::NUM_LOCK;
    codes[scancode::SCROLL_LOCK as usize] = LockKeys::SCROLL_LOCK;
    codes
}

static NORMAL_MAP: [u8; 256] = build_map(&NORMAL_PRIMARY, &KEYPAD_EXTENDED);
static SHIFT_MAP: [u8; 256] = build_map(&SHIFT_PRIMARY, &KEYPAD_EXTENDED);
static CTRL_MAP: [u8; 256] = build_map(&CTRL_PRIMARY, &KEYPAD_EXTENDED_CTRL);

static SHIFT_CODES: [Modifiers; 256] = build_shift_codes();
static TOGGLE_CODES: [LockKeys; 256] = build_toggle_codes();

/// Four character tables selected by the {CTRL, SHIFT} bit pair
///
/// Index 3 (ctrl + shift) reuses the ctrl table: shift adds nothing to a
/// control combination.
#[derive(Debug)]
pub struct KeymapBank {
    tables: [&'static [u8; 256]; 4],
}

impl KeymapBank {
    /// Table index for plain keys
    pub const PLAIN: usize = 0;
    /// Table index with shift held
    pub const SHIFTED: usize = 1;
    /// Table index with ctrl held
    pub const CONTROL: usize = 2;
    /// Table index with ctrl and shift held
    pub const CONTROL_SHIFTED: usize = 3;

    /// Looks up the character for `code` in table `index`
    ///
    /// `index` is taken modulo 4.
    #[inline]
    pub fn lookup(&self, index: usize, code: u8) -> u8 {
        self.tables[index & 0b11][code as usize]
    }

    /// Returns one of the four tables
    pub fn table(&self, index: usize) -> &'static [u8; 256] {
        self.tables[index & 0b11]
    }
}

/// The US keymap bank
pub static US_KEYMAP: KeymapBank = KeymapBank {
    tables: [&NORMAL_MAP, &SHIFT_MAP, &CTRL_MAP, &CTRL_MAP],
};

/// Returns the momentary modifier bits a scan code holds
#[inline]
pub fn shift_code(code: u8) -> Modifiers {
    SHIFT_CODES[code as usize]
}

/// Returns the lock bits a scan code flips
#[inline]
pub fn toggle_code(code: u8) -> LockKeys {
    TOGGLE_CODES[code as usize]
}
