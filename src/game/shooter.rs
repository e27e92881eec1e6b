use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::game::assets::{SpriteId, Sprites};
use crate::game::bomb::Bomb;
use crate::game::bullet::{Bullet, Owner};
use crate::game::collision::{collides, point_hits, CollisionParams};
use crate::game::enemy::{Enemy, EnemyKind, Wreck};
use crate::game::explosion::{Blast, Explosion};
use crate::game::geometry::{Rect as Area, Vec2};
use crate::game::image::{Image, Rgba};
use crate::game::lightning::{self, Bolt};
use crate::game::player::{HitOutcome, Player};
use crate::game::powerup::{Powerup, PowerupKind};
use crate::game::render::{fit_field, to_lines};
use crate::game::starfield::Starfield;
use crate::game::wave::{WaveDirector, WaveEvent};
use crate::game::Game;

const FIELD_W: f32 = 160.0;
const FIELD_H: f32 = 160.0;
const RAM_DAMAGE: u32 = 3;
const BANNER_TICKS: u32 = 90;
const PAUSE_DIM: f32 = 0.45;
// Wider pause blurs switch to the cheaper downsample
const MAX_BOX_BLUR: usize = 3;
const SHIELD_COLOR: Rgba = Rgba::new(110, 190, 255, 140);

#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub starting_lives: u32,
    pub collision: CollisionParams,
    pub drop_chance: f64,
    pub pause_blur_radius: usize,
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings::from(&Config::default())
    }
}

impl From<&Config> for GameSettings {
    fn from(config: &Config) -> Self {
        Self {
            starting_lives: config.starting_lives,
            collision: CollisionParams {
                samples: config.collision_samples,
                threshold: config.alpha_threshold,
            },
            drop_chance: config.powerup_drop_chance as f64,
            pause_blur_radius: config.pause_blur_radius,
            seed: config.seed,
        }
    }
}

pub struct Shooter {
    sprites: Sprites,
    settings: GameSettings,
    rng: StdRng,
    field: Area,
    starfield: Starfield,
    player: Player,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    powerups: Vec<Powerup>,
    bomb: Option<Bomb>,
    bolts: Vec<Bolt>,
    explosions: Vec<Explosion>,
    director: WaveDirector,
    score: u32,
    high_score: u32,
    game_over: bool,
    paused: bool,
    tick: u64,
    lightning_cooldown: u32,
    next_bomb_id: u32,
    banner: Option<(String, u32)>,
}

impl Shooter {
    pub fn new(sprites: Sprites, settings: GameSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(sprites, settings, rng)
    }

    fn with_rng(sprites: Sprites, settings: GameSettings, mut rng: StdRng) -> Self {
        let field = Area::new(0.0, 0.0, FIELD_W, FIELD_H);
        let starfield = Starfield::new(&mut rng, field);
        let player = Player::new(
            Vec2::new(field.center().x, field.bottom() - 12.0),
            settings.starting_lives,
        );
        Self {
            sprites,
            settings,
            rng,
            field,
            starfield,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            bomb: None,
            bolts: Vec::new(),
            explosions: Vec::new(),
            director: WaveDirector::new(1),
            score: 0,
            high_score: 0,
            game_over: false,
            paused: false,
            tick: 0,
            lightning_cooldown: 0,
            next_bomb_id: 0,
            banner: None,
        }
    }

    pub fn wave_number(&self) -> u32 {
        self.director.wave().number
    }

    #[cfg(test)]
    pub(crate) fn elapsed_ticks(&self) -> u64 {
        self.tick
    }

    /// Seed the on-screen record from the saved table.
    pub fn set_high_score(&mut self, score: u32) {
        self.high_score = self.high_score.max(score);
    }

    #[cfg(test)]
    pub(crate) fn force_game_over(&mut self, score: u32) {
        self.score = score;
        self.player.lives = 0;
        self.game_over = true;
    }

    // ── Actions ───────────────────────────────────────────────────────

    fn launch_bomb(&mut self) {
        if self.player.bombs == 0 || self.bomb.is_some() || !self.player.is_alive() {
            return;
        }
        self.player.bombs -= 1;
        self.next_bomb_id = self.next_bomb_id.wrapping_add(1);
        self.bomb = Some(Bomb::launch(self.next_bomb_id, self.player.pos()));
        debug!(bombs_left = self.player.bombs, "bomb launched");
    }

    fn fire_lightning(&mut self) {
        if self.player.lightning == 0 || self.lightning_cooldown > 0 || !self.player.is_alive() {
            return;
        }
        let Some(strike) = Bolt::strike(self.player.pos(), &mut self.enemies, &mut self.rng) else {
            debug!("lightning: no target in range");
            return;
        };
        self.player.lightning -= 1;
        self.lightning_cooldown = lightning::COOLDOWN;
        info!(hits = strike.hits, kills = strike.killed.len(), "lightning strike");
        self.bolts.push(strike.bolt);
        for wreck in strike.killed {
            self.on_enemy_killed(wreck);
        }
    }

    fn on_enemy_killed(&mut self, wreck: Wreck) {
        let Wreck { kind, pos, velocity } = wreck;
        self.score += kind.points();
        let blast = if kind == EnemyKind::Gunship { Blast::Large } else { Blast::Small };
        self.explosions.push(Explosion::new(&mut self.rng, pos, blast).drifting(velocity));
        if kind == EnemyKind::Gunship || self.rng.gen_bool(self.settings.drop_chance.clamp(0.0, 1.0)) {
            let drop = PowerupKind::roll(&mut self.rng);
            self.powerups.push(Powerup::new(drop, pos));
        }
        debug!(enemy = kind.name(), score = self.score, "enemy destroyed");
    }

    fn hurt_player(&mut self) {
        let pos = self.player.pos();
        match self.player.hit() {
            HitOutcome::Ignored => {}
            HitOutcome::Absorbed => debug!("shield absorbed a hit"),
            HitOutcome::LostLife => {
                self.explosions.push(Explosion::new(&mut self.rng, pos, Blast::Large));
                self.bullets.retain(|b| b.owner == Owner::Player);
                info!(lives = self.player.lives, "player lost a life");
            }
            HitOutcome::Destroyed => {
                self.explosions.push(Explosion::new(&mut self.rng, pos, Blast::Large));
                self.game_over = true;
                if self.score > self.high_score {
                    self.high_score = self.score;
                }
                info!(score = self.score, wave = self.wave_number(), "game over");
            }
        }
    }

    // ── Per-tick systems ──────────────────────────────────────────────

    fn update_player(&mut self) {
        self.player.update(&self.field);
        self.lightning_cooldown = self.lightning_cooldown.saturating_sub(1);
        let volley = self.player.fire();
        self.bullets.extend(volley);
    }

    fn update_enemies(&mut self) {
        let target = self.player.pos();
        for enemy in &mut self.enemies {
            let volley = enemy.update(&mut self.rng, target, &self.field);
            self.bullets.extend(volley);
        }
    }

    fn update_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.update(&self.field);
        }
    }

    fn update_powerups(&mut self) {
        for powerup in &mut self.powerups {
            powerup.update(&self.field);
        }
    }

    fn update_bomb(&mut self) {
        let Some(bomb) = &mut self.bomb else { return };
        if bomb.update() {
            info!(x = bomb.body.pos.x, y = bomb.body.pos.y, "bomb detonated");
            let pos = bomb.body.pos;
            self.explosions.push(Explosion::new(&mut self.rng, pos, Blast::Large));
        }
        let report = bomb.apply_blast(&mut self.enemies, &mut self.bullets);
        if report.bullets_cleared > 0 {
            debug!(cleared = report.bullets_cleared, "blast wiped enemy fire");
        }
        if bomb.is_done() {
            self.bomb = None;
        }
        for wreck in report.killed {
            self.on_enemy_killed(wreck);
        }
    }

    fn update_effects(&mut self) {
        for bolt in &mut self.bolts {
            bolt.update(&mut self.rng);
        }
        for explosion in &mut self.explosions {
            explosion.update();
        }
        if let Some((_, ticks)) = &mut self.banner {
            *ticks = ticks.saturating_sub(1);
        }
        if matches!(self.banner, Some((_, 0))) {
            self.banner = None;
        }
    }

    fn resolve_collisions(&mut self) {
        let params = self.settings.collision;
        let mut kills = Vec::new();

        // Player bullets vs enemies
        for bullet in self.bullets.iter_mut().filter(|b| b.alive && b.owner == Owner::Player) {
            let bullet_img = self.sprites.get(bullet.sprite);
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                let enemy_img = self.sprites.get(enemy.kind.sprite());
                if collides(bullet_img, bullet.body.pos, enemy_img, enemy.pos, params, &mut self.rng) {
                    bullet.alive = false;
                    if enemy.damage(bullet.damage) {
                        kills.push(enemy.wreck());
                    }
                    break;
                }
            }
        }

        // Contact fuse: the bomb goes off when its centre touches a hull
        if let Some(bomb) = &mut self.bomb {
            if bomb.is_flying() {
                let touched = self.enemies.iter().any(|e| {
                    e.alive && point_hits(self.sprites.get(e.kind.sprite()), e.pos, bomb.body.pos, params.threshold)
                });
                if touched && bomb.detonate() {
                    info!("bomb detonated on contact");
                    let pos = bomb.body.pos;
                    self.explosions.push(Explosion::new(&mut self.rng, pos, Blast::Large));
                }
            }
        }

        let mut player_hit = false;
        let player_img = self.sprites.get(SpriteId::Player);
        let player_pos = self.player.pos();
        if self.player.is_hittable() {
            // Enemy bullets vs player
            for bullet in self.bullets.iter_mut().filter(|b| b.alive && b.owner == Owner::Enemy) {
                if collides(self.sprites.get(bullet.sprite), bullet.body.pos, player_img, player_pos, params, &mut self.rng) {
                    bullet.alive = false;
                    player_hit = true;
                    break;
                }
            }
            // Enemies ramming the player
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                if collides(self.sprites.get(enemy.kind.sprite()), enemy.pos, player_img, player_pos, params, &mut self.rng) {
                    player_hit = true;
                    if enemy.damage(RAM_DAMAGE) {
                        kills.push(enemy.wreck());
                    }
                }
            }
        }

        // Powerups vs player
        let mut collected = Vec::new();
        if self.player.is_alive() {
            for powerup in self.powerups.iter_mut().filter(|p| p.alive) {
                if collides(self.sprites.get(powerup.kind.sprite()), powerup.pos, player_img, player_pos, params, &mut self.rng) {
                    powerup.alive = false;
                    collected.push(powerup.kind);
                }
            }
        }

        for wreck in kills {
            self.on_enemy_killed(wreck);
        }
        for kind in collected {
            self.score += kind.apply(&mut self.player);
            info!(powerup = kind.name(), "powerup collected");
        }
        if player_hit {
            self.hurt_player();
        }
    }

    fn cull(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.bullets.retain(|b| b.alive);
        self.powerups.retain(|p| p.alive);
        self.bolts.retain(|b| !b.is_finished());
        self.explosions.retain(|e| !e.is_finished());
    }

    fn advance_waves(&mut self) {
        for event in self.director.tick(self.enemies.len()) {
            match event {
                WaveEvent::Started(number) => {
                    info!(wave = number, enemies = self.director.wave().enemy_count(), "wave started");
                    self.banner = Some((format!("WAVE {}", number), BANNER_TICKS));
                }
                WaveEvent::Spawn { spec, difficulty } => {
                    debug!(kind = spec.kind.name(), count = spec.count, difficulty, "spawning group");
                    self.enemies.extend(spec.spawn(difficulty, self.field.w));
                }
                WaveEvent::Cleared { number, bonus } => {
                    self.score += bonus;
                    info!(wave = number, bonus, score = self.score, "wave cleared");
                    self.banner = Some((format!("WAVE {} CLEAR  +{}", number, bonus), BANNER_TICKS));
                }
            }
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────

    fn blit(fb: &mut Image, img: &Image, center: Vec2) {
        let size = img.size();
        fb.draw(img, center.x - size.x / 2.0, center.y - size.y / 2.0);
    }

    /// Composite the whole scene into a field-sized framebuffer.
    pub fn compose(&self) -> Image {
        let mut fb = Image::new(self.field.w as usize, self.field.h as usize);
        self.starfield.draw(&mut fb);

        for powerup in &self.powerups {
            Self::blit(&mut fb, self.sprites.get(powerup.kind.sprite()), powerup.pos);
        }
        for enemy in &self.enemies {
            let img = self.sprites.get(enemy.kind.sprite());
            if enemy.flash > 0 {
                let size = img.size();
                fb.draw_silhouette(
                    img,
                    enemy.pos.x - size.x / 2.0,
                    enemy.pos.y - size.y / 2.0,
                    Rgba::opaque(255, 255, 255),
                );
            } else {
                Self::blit(&mut fb, img, enemy.pos);
            }
        }
        for bullet in &self.bullets {
            Self::blit(&mut fb, self.sprites.get(bullet.sprite), bullet.body.pos);
        }
        if let Some(bomb) = &self.bomb {
            bomb.draw(&mut fb, self.sprites.get(SpriteId::Bomb));
        }
        if self.player.visible(self.tick) {
            Self::blit(&mut fb, self.sprites.get(SpriteId::Player), self.player.pos());
            if self.player.shield > 0 {
                fb.ring(self.player.pos(), 7.5, SHIELD_COLOR);
            }
        }
        for bolt in &self.bolts {
            bolt.draw(&mut fb);
        }
        for explosion in &self.explosions {
            explosion.draw(&mut fb);
        }
        fb
    }

    fn status_line(&self) -> Line<'static> {
        let lives_str = "\u{2666} ".repeat(self.player.lives as usize);
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        Line::from(vec![
            Span::styled(" \u{1f680} ", Style::default()),
            Span::styled(
                format!("Score: {} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(
                format!("Lives: {}", lives_str),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            sep(),
            if self.director.in_intermission() {
                Span::styled(format!("Next: {} ", self.wave_number()), Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(format!("Wave: {} ", self.wave_number()), Style::default().fg(Color::Green))
            },
            sep(),
            Span::styled(
                format!("Bombs: {} ", self.player.bombs),
                Style::default().fg(Color::Rgb(255, 120, 80)),
            ),
            sep(),
            Span::styled(
                format!("Bolts: {} ", self.player.lightning),
                Style::default().fg(Color::Rgb(100, 200, 255)),
            ),
            sep(),
            Span::styled(
                format!("Gun: {} ", "\u{25b2}".repeat(self.player.weapon_level as usize)),
                Style::default().fg(Color::Rgb(255, 230, 90)),
            ),
            sep(),
            Span::styled(format!("High: {} ", self.high_score), Style::default().fg(Color::Cyan)),
        ])
    }
}

impl Game for Shooter {
    fn update(&mut self) {
        if self.game_over || self.paused {
            return;
        }
        self.tick += 1;
        self.starfield.update(&mut self.rng);
        self.update_player();
        self.update_enemies();
        self.update_bullets();
        self.update_powerups();
        self.update_bomb();
        self.update_effects();
        self.resolve_collisions();
        self.cull();
        if !self.game_over {
            self.advance_waves();
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if !self.game_over {
                    self.paused = !self.paused;
                    debug!(paused = self.paused, "pause toggled");
                }
            }
            _ => {
                if self.game_over {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.reset();
                    }
                    return;
                }
                if self.paused {
                    return;
                }
                match key.code {
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                        self.player.thrust(Vec2::new(-1.0, 0.0))
                    }
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                        self.player.thrust(Vec2::new(1.0, 0.0))
                    }
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                        self.player.thrust(Vec2::new(0.0, -1.0))
                    }
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                        self.player.thrust(Vec2::new(0.0, 1.0))
                    }
                    KeyCode::Char(' ') => self.player.pull_trigger(),
                    KeyCode::Char('b') | KeyCode::Char('B') => self.launch_bomb(),
                    KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('x') | KeyCode::Char('X') => {
                        self.fire_lightning()
                    }
                    _ => {}
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(90, 170, 255)))
            .title(" Starstrike ")
            .title_style(Style::default().fg(Color::Rgb(140, 210, 255)).add_modifier(Modifier::BOLD));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(self.status_line()), chunks[0]);

        let view = fit_field(chunks[1], self.field.w, self.field.h);
        if view.width > 0 && view.height > 0 {
            let mut fb = self.compose();
            if self.paused {
                let radius = self.settings.pause_blur_radius;
                fb = if radius > MAX_BOX_BLUR {
                    fb.downsample_blur(radius)
                } else {
                    fb.box_blur(radius)
                };
                fb.dim(PAUSE_DIM);
            }
            let lines = to_lines(&fb, view.width as usize, view.height as usize);
            frame.render_widget(Paragraph::new(lines), view);

            if let Some((text, _)) = &self.banner {
                let banner_area = Rect::new(view.x, view.y + view.height / 3, view.width, 1);
                let banner = Paragraph::new(Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
                )))
                .alignment(Alignment::Center);
                frame.render_widget(banner, banner_area);
            }
        }

        if self.game_over {
            let msg = Paragraph::new(Line::from(vec![
                Span::styled(" GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled("Press ENTER to restart, Esc for menu", Style::default().fg(Color::Gray)),
            ]));
            frame.render_widget(msg, chunks[2]);
        } else if self.paused {
            let msg = Paragraph::new(Line::from(vec![Span::styled(
                " PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )]));
            frame.render_widget(msg, chunks[2]);
        } else {
            let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::DarkGray));
            let help = Paragraph::new(Line::from(vec![
                key(" \u{2190}\u{2191}\u{2192}\u{2193}"),
                text(" Move | "),
                key("Space"),
                text(" Fire | "),
                key("B"),
                text(" Bomb | "),
                key("L"),
                text(" Lightning | "),
                key("P"),
                text(" Pause | "),
                key("Esc"),
                text(" Menu"),
            ]));
            frame.render_widget(help, chunks[2]);
        }
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        let hs = self.high_score;
        *self = Shooter::with_rng(
            self.sprites.clone(),
            self.settings.clone(),
            StdRng::seed_from_u64(seed),
        );
        self.high_score = hs;
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}
