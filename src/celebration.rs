use rand::seq::SliceRandom;
use rand::Rng;

const CONFETTI: [char; 6] = ['*', '+', 'o', '•', '✦', '★'];
const GRAVITY: f64 = 12.0;
const DT: f64 = 0.1;

/// One piece of confetti
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiPiece {
    fn launch<R: Rng>(rng: &mut R, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-4.0..4.0),
            vel_y: rng.gen_range(-6.0..-2.0),
            symbol: *CONFETTI.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..3.5),
        }
    }

    /// Advance by `dt` seconds. Returns false once the piece has burnt out.
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti burst shown over the winner screen
#[derive(Debug, Default)]
pub struct Celebration {
    pub pieces: Vec<ConfettiPiece>,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst from a few points along the top third of a `width` x `height` area.
    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.width = width.max(1) as f64;
        self.height = height.max(1) as f64;
        self.pieces.clear();

        let origins = 5;
        for i in 0..origins {
            let x = self.width * (i as f64 + 0.5) / origins as f64;
            let y = self.height / 3.0;
            for _ in 0..12 {
                self.pieces.push(ConfettiPiece::launch(&mut rng, x, y));
            }
        }
        self.is_active = true;
    }

    pub fn stop(&mut self) {
        self.pieces.clear();
        self.is_active = false;
    }

    /// Called on every tick.
    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }
        let (width, height) = (self.width, self.height);
        self.pieces.retain_mut(|p| {
            let alive = p.update(DT);
            let off_screen = p.y > height + 2.0 || p.x < -2.0 || p.x > width + 2.0;
            alive && !off_screen
        });
        if self.pieces.is_empty() {
            self.is_active = false;
        }
    }
}
