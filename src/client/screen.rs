//! Screen geometry for a 1920x1080 client window.
//!
//! Points are click targets, regions are capture rectangles handed to the
//! perception collaborator. The engine treats both as opaque anchors: it only
//! compares them for equality and looks them up by slot index.

use serde::Serialize;

/// A click target in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// A capture rectangle `(left, top, right, bottom)` in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Region { left, top, right, bottom }
    }
}

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

const fn r(left: i32, top: i32, right: i32, bottom: i32) -> Region {
    Region::new(left, top, right, bottom)
}

/// Bench slots, left to right.
pub const BENCH_LOC: [Point; 9] = [
    p(425, 777),
    p(542, 777),
    p(658, 777),
    p(778, 777),
    p(892, 777),
    p(1010, 777),
    p(1128, 777),
    p(1244, 777),
    p(1359, 777),
];

/// Board hexes from bottom left (0) to top right (27).
pub const BOARD_LOC: [Point; 28] = [
    p(581, 651),
    p(707, 651),
    p(839, 651),
    p(966, 651),
    p(1091, 651),
    p(1222, 651),
    p(1349, 651),
    p(532, 571),
    p(660, 571),
    p(776, 571),
    p(903, 571),
    p(1022, 571),
    p(1147, 571),
    p(1275, 571),
    p(609, 494),
    p(723, 494),
    p(841, 494),
    p(962, 494),
    p(1082, 494),
    p(1198, 494),
    p(1318, 494),
    p(557, 423),
    p(673, 423),
    p(791, 423),
    p(907, 423),
    p(1019, 423),
    p(1138, 423),
    p(1251, 423),
];

/// Item bench slots: click target and the tooltip region read when hovering.
pub const ITEM_POS: [(Point, Region); 10] = [
    (p(273, 753), r(373, 794, 611, 824)),
    (p(348, 737), r(451, 778, 689, 808)),
    (p(289, 692), r(391, 734, 629, 764)),
    (p(356, 676), r(458, 717, 696, 747)),
    (p(307, 631), r(410, 674, 648, 704)),
    (p(323, 586), r(422, 628, 658, 658)),
    (p(407, 679), r(507, 721, 745, 751)),
    (p(379, 632), r(482, 674, 721, 704)),
    (p(396, 582), r(497, 625, 735, 655)),
    (p(457, 628), r(559, 670, 797, 701)),
];

/// Shop purchase buttons.
pub const BUY_LOC: [Point; 5] = [
    p(575, 992),
    p(775, 992),
    p(975, 992),
    p(1175, 992),
    p(1375, 992),
];

pub const PANEL_NAME_POS: Region = r(1707, 320, 1821, 342);
pub const ANVIL_MSG_POS: Region = r(818, 838, 932, 859);
pub const PORTAL_AUGMENT_POS: Region = r(660, 285, 845, 340);
pub const SECONDS_REMAINING_POS: Region = r(1128, 8, 1160, 30);

pub const AUGMENT_POS: [Region; 3] = [
    r(417, 552, 687, 582),
    r(825, 552, 1095, 582),
    r(1230, 552, 1500, 582),
];
pub const AUGMENT_LOC: [Point; 3] = [p(549, 445), p(955, 445), p(1365, 445)];
pub const AUGMENT_ROLL: [Point; 3] = [p(549, 875), p(960, 875), p(1363, 875)];

pub const PORTALS_POS: [Region; 3] = [
    r(63, 333, 262, 375),
    r(63, 424, 262, 465),
    r(63, 514, 262, 555),
];
pub const PORTALS_LOC: [Point; 3] = [p(32, 345), p(32, 440), p(32, 526)];
pub const PORTALS_VOTES: [Point; 3] = [p(354, 469), p(354, 560), p(354, 648)];
pub const PORTAL_AUGMENT_LOC: Point = p(500, 350);

pub const ITEM_PICKUP_LOC: [Point; 4] = [p(1490, 605), p(1293, 313), p(1093, 235), p(683, 309)];
pub const CAROUSEL_LOC: [Point; 3] = [p(964, 620), p(775, 505), p(1150, 505)];

pub const EXIT_NOW_LOC: Point = p(962, 575);
pub const BUY_XP_LOC: Point = p(364, 964);
pub const REFRESH_LOC: Point = p(364, 1039);
pub const DEFAULT_LOC: Point = p(60, 222);
pub const DEFAULT_TACTICIAN_LOC: Point = p(466, 474);
pub const SURRENDER_LOC: Point = p(771, 843);
pub const SURRENDER_TWO_LOC: Point = p(832, 489);
pub const SECONDS_REMAINING_LOC: Point = p(1143, 19);

/// Returns the bench slot whose anchor is `point`.
pub fn bench_index(point: Point) -> Option<usize> {
    BENCH_LOC.iter().position(|&b| b == point)
}

/// Returns the board hex whose anchor is `point`.
pub fn board_index(point: Point) -> Option<usize> {
    BOARD_LOC.iter().position(|&b| b == point)
}

/// Returns the item slot whose click target is `point`.
pub fn item_index(point: Point) -> Option<usize> {
    ITEM_POS.iter().position(|(i, _)| *i == point)
}

/// Returns the shop slot whose buy button is `point`.
pub fn shop_index(point: Point) -> Option<usize> {
    BUY_LOC.iter().position(|&b| b == point)
}
