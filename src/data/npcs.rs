use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcId {
    David,
    Moses,
    Mary,
    Abraham,
    Joseph,
    Peter,
}

/// A fixed villager: who they are, what they say, where they stand.
#[derive(Debug, Clone, Copy)]
pub struct BiblicalNpc {
    pub id: NpcId,
    pub name: &'static str,
    pub korean_name: &'static str,
    pub greeting: &'static str,
    pub message: &'static str,
    pub blessing: &'static str,
    /// Layout position (top-left origin, y down) on the village map.
    pub layout: (f32, f32),
    /// Drawn when the portrait image is unavailable.
    pub placeholder: Color,
}

impl BiblicalNpc {
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.greeting.to_string(),
            self.message.to_string(),
            self.blessing.to_string(),
        ]
    }
}

pub const VILLAGE_NPCS: [BiblicalNpc; 6] = [
    BiblicalNpc {
        id: NpcId::David,
        name: "David",
        korean_name: "다윗",
        greeting: "샬롬! 나는 다윗이야.",
        message: "여호와는 나의 목자시니, 내게 부족함이 없으리로다.",
        blessing: "오늘도 찬양하며 하나님께 영광을 돌리자! 🎵",
        layout: (80.0, 250.0),
        placeholder: Color::srgb(0.255, 0.412, 0.882),
    },
    BiblicalNpc {
        id: NpcId::Moses,
        name: "Moses",
        korean_name: "모세",
        greeting: "평안하기를! 나는 모세라네.",
        message: "여호와께서 너와 함께 하시니 두려워 말라.",
        blessing: "약속의 땅을 향해 담대히 나아가거라! 🏔️",
        layout: (310.0, 300.0),
        placeholder: Color::srgb(0.545, 0.451, 0.333),
    },
    BiblicalNpc {
        id: NpcId::Mary,
        name: "Mary",
        korean_name: "마리아",
        greeting: "안녕하세요, 평화가 함께하길.",
        message: "내 마음이 주님을 찬양하며, 내 영이 구주 하나님을 기뻐합니다.",
        blessing: "주님의 은혜가 늘 함께하시길 기도해요. 🕊️",
        layout: (100.0, 450.0),
        placeholder: Color::srgb(0.529, 0.808, 0.922),
    },
    BiblicalNpc {
        id: NpcId::Abraham,
        name: "Abraham",
        korean_name: "아브라함",
        greeting: "환영하네, 젊은이여.",
        message: "믿음으로 나아가라. 하나님은 약속을 지키시는 분이시다.",
        blessing: "네 자손이 하늘의 별처럼 번성하리라! ⭐",
        layout: (290.0, 500.0),
        placeholder: Color::srgb(0.855, 0.647, 0.125),
    },
    BiblicalNpc {
        id: NpcId::Joseph,
        name: "Joseph",
        korean_name: "요셉",
        greeting: "반갑네! 나는 요셉이야.",
        message: "어려움 속에서도 하나님은 함께 계셨어.",
        blessing: "모든 일이 합력하여 선을 이루리라! 🌈",
        layout: (150.0, 650.0),
        placeholder: Color::srgb(1.0, 0.549, 0.0),
    },
    BiblicalNpc {
        id: NpcId::Peter,
        name: "Peter",
        korean_name: "베드로",
        greeting: "주의 평화가 함께하길!",
        message: "예수님을 따르는 것, 그것이 가장 중요하다네.",
        blessing: "너의 믿음 위에 교회가 세워지리라! ⚓",
        layout: (240.0, 700.0),
        placeholder: Color::srgb(0.275, 0.510, 0.706),
    },
];

/// `VILLAGE_NPCS` is declared in `NpcId` order.
pub fn npc(id: NpcId) -> &'static BiblicalNpc {
    &VILLAGE_NPCS[id as usize]
}
