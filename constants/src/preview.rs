/// Width of the colour scale strip appended to previews (pixels)
pub const COLOUR_SCALE_WIDTH: u32 = 24;

/// Gap between the heightmap and the colour scale strip (pixels)
pub const COLOUR_SCALE_GAP: u32 = 8;

/// Background fill for the preview canvas
pub const PREVIEW_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Terrain false-colour stops: (normalised height, RGB)
pub const TERRAIN_STOPS: &[(f64, [u8; 3])] = &[
    (0.00, [51, 51, 153]),   // deep water
    (0.15, [0, 153, 255]),   // shallows
    (0.25, [0, 204, 102]),   // lowland
    (0.50, [255, 255, 153]), // plateau
    (0.75, [128, 92, 84]),   // highland
    (1.00, [255, 255, 255]), // peak
];
