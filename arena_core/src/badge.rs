/// Special badge reserved for the podium. Every other position renders as a
/// plain numeric indicator, which is why the resolver returns an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeKind {
    FirstPlace,
    SecondPlace,
    ThirdPlace,
}

impl BadgeKind {
    pub fn name(&self) -> &'static str {
        match self {
            BadgeKind::FirstPlace => "First Place",
            BadgeKind::SecondPlace => "Second Place",
            BadgeKind::ThirdPlace => "Third Place",
        }
    }

    /// Asset key of the badge art shipped with the client.
    pub fn asset(&self) -> &'static str {
        match self {
            BadgeKind::FirstPlace => "badges/iridescent",
            BadgeKind::SecondPlace => "badges/crimson",
            BadgeKind::ThirdPlace => "badges/diamond",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BadgeKind::FirstPlace => "#fbbf24",
            BadgeKind::SecondPlace => "#dc2626",
            BadgeKind::ThirdPlace => "#06b6d4",
        }
    }
}

pub fn badge_for(position: u32) -> Option<BadgeKind> {
    match position {
        1 => Some(BadgeKind::FirstPlace),
        2 => Some(BadgeKind::SecondPlace),
        3 => Some(BadgeKind::ThirdPlace),
        _ => None,
    }
}

pub fn has_special_badge(position: u32) -> bool {
    (1..=3).contains(&position)
}
