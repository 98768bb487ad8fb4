use crate::shared::*;

/// Three-line birthday template spoken by one family role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyTemplate {
    pub greeting: &'static str,
    pub message: &'static str,
    pub blessing: &'static str,
}

/// Speaker of the closing line once everyone has spoken.
pub const CLOSING_SPEAKER: &str = "🎉 모두 함께";

pub fn family_label(role: FamilyRole) -> &'static str {
    match role {
        FamilyRole::Mom => "엄마",
        FamilyRole::Dad => "아빠",
        FamilyRole::Grandma => "할머니",
        FamilyRole::Grandpa => "할아버지",
        FamilyRole::Brother => "남동생",
        FamilyRole::Sister => "여동생",
        FamilyRole::OlderBrother => "형/오빠",
        FamilyRole::OlderSister => "누나/언니",
        FamilyRole::Husband => "남편",
        FamilyRole::Wife => "부인",
        FamilyRole::Son => "아들",
        FamilyRole::Daughter => "딸",
    }
}

pub fn family_member(role: FamilyRole) -> FamilyMember {
    FamilyMember {
        role,
        label: family_label(role).to_string(),
    }
}

pub fn family_template(role: FamilyRole) -> FamilyTemplate {
    match role {
        FamilyRole::Mom => FamilyTemplate {
            greeting: "사랑하는 우리 아이야~",
            message: "생일 축하해! 오늘 하루도 하나님의 사랑 안에서 행복하길 바래.",
            blessing: "엄마가 항상 기도할게. 사랑해! 💕",
        },
        FamilyRole::Dad => FamilyTemplate {
            greeting: "우리 자랑스러운 아이야!",
            message: "생일 축하한다! 네가 이렇게 훌륭하게 자라줘서 감사해.",
            blessing: "앞으로도 하나님과 함께 멋진 인생을 살아가길! 💪",
        },
        FamilyRole::Grandma => FamilyTemplate {
            greeting: "아이고, 우리 손주~",
            message: "생일 축하해! 할머니가 많이 보고 싶었어.",
            blessing: "하나님의 복이 항상 함께 하길 기도해. 🙏",
        },
        FamilyRole::Grandpa => FamilyTemplate {
            greeting: "우리 귀한 손주야!",
            message: "생일 진심으로 축하하네.",
            blessing: "건강하고 지혜롭게 자라거라. 할아버지가 축복해! ✨",
        },
        FamilyRole::Brother => FamilyTemplate {
            greeting: "누나/형! (아니면 언니/오빠?)",
            message: "생일 축하해~! 선물은... 마음으로!",
            blessing: "오늘 하루 즐겁게 보내! 🎈",
        },
        FamilyRole::Sister => FamilyTemplate {
            greeting: "오빠/언니! (아니면 형/누나?)",
            message: "생일 축하해요~! 사랑해요!",
            blessing: "오늘은 특별히 안 싸울게요! 🎀",
        },
        FamilyRole::OlderBrother => FamilyTemplate {
            greeting: "동생아!",
            message: "생일 축하해! 많이 컸구나.",
            blessing: "형/오빠로서 항상 응원할게! 💙",
        },
        FamilyRole::OlderSister => FamilyTemplate {
            greeting: "우리 동생~",
            message: "생일 축하해! 벌써 이만큼 자랐네.",
            blessing: "언니/누나가 항상 편이야! 💜",
        },
        FamilyRole::Husband => FamilyTemplate {
            greeting: "여보~",
            message: "생일 축하해요! 당신을 만나 너무 행복해요.",
            blessing: "앞으로도 함께 행복하게 살아요. 사랑해요! 💑",
        },
        FamilyRole::Wife => FamilyTemplate {
            greeting: "자기야~",
            message: "생일 축하해! 당신이 있어 매일이 감사해.",
            blessing: "오늘 하루 특별하게 보내자! 사랑해! 💏",
        },
        FamilyRole::Son => FamilyTemplate {
            greeting: "아들아!",
            message: "생일 축하해! 네가 우리 가정의 기쁨이야.",
            blessing: "하나님 안에서 훌륭한 사람으로 자라거라! 🌟",
        },
        FamilyRole::Daughter => FamilyTemplate {
            greeting: "딸아~",
            message: "생일 축하해! 네가 있어서 매일이 행복해.",
            blessing: "하나님의 사랑받는 딸로 빛나길! ⭐",
        },
    }
}

/// The three lines a family member says, with the player's name
/// addressed in the middle one.
pub fn family_lines(role: FamilyRole, player_name: &str) -> Vec<String> {
    let t = family_template(role);
    vec![
        t.greeting.to_string(),
        format!("{}아, {}", player_name, t.message),
        t.blessing.to_string(),
    ]
}

pub fn closing_line(player_name: &str) -> String {
    format!(
        "{}님, 생일 축하합니다!\n하나님의 축복이 늘 함께하시길! 🙏",
        player_name
    )
}

pub fn celebration_title(player_name: &str) -> String {
    format!("🎂 {}님의 생일을 축하합니다! 🎂", player_name)
}

pub fn age_label(age: AgeGroup) -> &'static str {
    match age {
        AgeGroup::Child => "어린이 (0-12세)",
        AgeGroup::Teen => "청소년 (13-19세)",
        AgeGroup::YoungAdult => "청년 (20-35세)",
        AgeGroup::Adult => "장년 (36-60세)",
        AgeGroup::Senior => "어르신 (60세+)",
    }
}

pub fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "👦 남자",
        Gender::Female => "👧 여자",
    }
}
