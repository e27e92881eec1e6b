use crate::error::SpriteError;
use crate::game::image::{Image, Rgba};

const PALETTE: &[(char, Rgba)] = &[
    ('W', Rgba::opaque(240, 240, 255)),
    ('G', Rgba::opaque(80, 255, 120)),
    ('g', Rgba::opaque(30, 150, 70)),
    ('C', Rgba::opaque(80, 210, 255)),
    ('c', Rgba::opaque(40, 110, 170)),
    ('R', Rgba::opaque(255, 80, 80)),
    ('r', Rgba::opaque(150, 30, 40)),
    ('O', Rgba::opaque(255, 160, 40)),
    ('Y', Rgba::opaque(255, 230, 90)),
    ('P', Rgba::opaque(210, 120, 255)),
    ('p', Rgba::opaque(110, 50, 160)),
    ('B', Rgba::opaque(90, 130, 255)),
    ('M', Rgba::opaque(255, 90, 200)),
    ('s', Rgba::new(150, 220, 255, 110)),
];

const PLAYER: &str = r#"
    ....W....
    ...CWC...
    ...CWC...
    ..cCWCc..
    .GcCCCcG.
    GGgCCCgGG
    G.g.O.g.G
    ....Y....
"#;

const SCOUT: &str = r#"
    R.....R
    RR...RR
    .RRRRR.
    .RrWrR.
    ..RRR..
    ...R...
"#;

const WEAVER: &str = r#"
    P.......P
    PP.ppp.PP
    .PPPPPPP.
    ..PWpWP..
    ...PPP...
    ....P....
"#;

const SPINNER: &str = r#"
    ..OOO..
    .O.Y.O.
    O.YYY.O
    OYYWYYO
    O.YYY.O
    .O.Y.O.
    ..OOO..
"#;

const GUNSHIP: &str = r#"
    ..r.........r..
    .rRr.......rRr.
    .RRRRRRRRRRRRR.
    RRrRRRRWRRRRrRR
    RRrRRRWWWRRRrRR
    .RRRRRRWRRRRRR.
    ..RRR.RRR.RRR..
    ..rr..rOr..rr..
    .......Y.......
"#;

const PLAYER_BULLET: &str = r#"
    W
    Y
    O
"#;

const ENEMY_BULLET: &str = r#"
    MM
    MM
"#;

const POWERUP_WEAPON: &str = r#"
    .YYY.
    YY.YY
    Y.W.Y
    YY.YY
    .YYY.
"#;

const POWERUP_BOMB: &str = r#"
    .RRR.
    RRWRR
    RWWWR
    RRWRR
    .RRR.
"#;

const POWERUP_LIGHTNING: &str = r#"
    .CCC.
    CC.WC
    C.W.C
    CW.CC
    .CCC.
"#;

const POWERUP_SHIELD: &str = r#"
    .BBB.
    BsssB
    BsWsB
    BsssB
    .BBB.
"#;

const BOMB: &str = r#"
    .W.
    RRR
    RYR
    .R.
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteId {
    Player,
    Scout,
    Weaver,
    Spinner,
    Gunship,
    PlayerBullet,
    EnemyBullet,
    PowerupWeapon,
    PowerupBomb,
    PowerupLightning,
    PowerupShield,
    Bomb,
}

/// Every image the game draws, parsed once at startup.
#[derive(Clone, Debug)]
pub struct Sprites {
    pub player: Image,
    pub scout: Image,
    pub weaver: Image,
    pub spinner: Image,
    pub gunship: Image,
    pub player_bullet: Image,
    pub enemy_bullet: Image,
    pub powerup_weapon: Image,
    pub powerup_bomb: Image,
    pub powerup_lightning: Image,
    pub powerup_shield: Image,
    pub bomb: Image,
}

fn load(name: &'static str, art: &str) -> Result<Image, SpriteError> {
    Image::parse(art, PALETTE).map_err(|source| SpriteError::Named {
        name,
        source: Box::new(source),
    })
}

impl Sprites {
    pub fn load() -> Result<Self, SpriteError> {
        Ok(Self {
            player: load("player", PLAYER)?,
            scout: load("scout", SCOUT)?,
            weaver: load("weaver", WEAVER)?,
            spinner: load("spinner", SPINNER)?,
            gunship: load("gunship", GUNSHIP)?,
            player_bullet: load("player_bullet", PLAYER_BULLET)?,
            enemy_bullet: load("enemy_bullet", ENEMY_BULLET)?,
            powerup_weapon: load("powerup_weapon", POWERUP_WEAPON)?,
            powerup_bomb: load("powerup_bomb", POWERUP_BOMB)?,
            powerup_lightning: load("powerup_lightning", POWERUP_LIGHTNING)?,
            powerup_shield: load("powerup_shield", POWERUP_SHIELD)?,
            bomb: load("bomb", BOMB)?,
        })
    }

    pub fn get(&self, id: SpriteId) -> &Image {
        match id {
            SpriteId::Player => &self.player,
            SpriteId::Scout => &self.scout,
            SpriteId::Weaver => &self.weaver,
            SpriteId::Spinner => &self.spinner,
            SpriteId::Gunship => &self.gunship,
            SpriteId::PlayerBullet => &self.player_bullet,
            SpriteId::EnemyBullet => &self.enemy_bullet,
            SpriteId::PowerupWeapon => &self.powerup_weapon,
            SpriteId::PowerupBomb => &self.powerup_bomb,
            SpriteId::PowerupLightning => &self.powerup_lightning,
            SpriteId::PowerupShield => &self.powerup_shield,
            SpriteId::Bomb => &self.bomb,
        }
    }
}
