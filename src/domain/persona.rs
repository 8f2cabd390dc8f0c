//! Drunk Commentator Persona - 醉酒解说员人格
//!
//! 把平铺直叙的飞镖解说改写成醉醺醺的解说员口吻。变换每次调用
//! 随机（不做记忆化、不保证可复现），缓存 key 始终取变换前的原文，
//! 因此同一句解说的缓存命中回放的是首次合成时的那个随机变体

use rand::seq::IndexedRandom;
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

/// 关键词替换的独立触发概率
const REPLACE_PROB: f64 = 0.4;
/// 高分桶前置感叹词概率
const HIGH_INTERJECT_PROB: f64 = 0.6;
/// 低分桶前置感叹词概率
const LOW_INTERJECT_PROB: f64 = 0.5;
/// 碎碎念插入概率
const FILLER_PROB: f64 = 0.3;
/// 尾音拖长概率
const TRAIL_OFF_PROB: f64 = 0.2;
/// 词数超过该值才允许插碎碎念
const FILLER_MIN_WORDS: usize = 3;

/// 投掷质量标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowQuality {
    Great,
    Good,
    Okay,
    Bad,
    Miss,
    Bust,
    GameWinner,
}

impl ThrowQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Bad => "bad",
            Self::Miss => "miss",
            Self::Bust => "bust",
            Self::GameWinner => "game_winner",
        }
    }

    /// 质量落在哪个情绪桶（高分欢呼 / 低分嘲讽），其余不配感叹词
    fn bucket(self) -> Option<QualityBucket> {
        match self {
            Self::Great | Self::GameWinner => Some(QualityBucket::High),
            Self::Bad | Self::Miss => Some(QualityBucket::Low),
            Self::Good | Self::Okay | Self::Bust => None,
        }
    }
}

impl std::fmt::Display for ThrowQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum QualityBucket {
    High,
    Low,
}

/// 醉酒解说员人格
///
/// 固定的替换词表 / 感叹词表 / 碎碎念表，构造后只读
///
/// 不变量:
/// - 非空输入永远产出非空输出，任何输入都不 panic
/// - 每个关键词在单次调用里至多替换一次（替换首个匹配）
/// - 除进程级随机源外无副作用
pub struct DrunkPersona {
    /// 关键词 -> 醉话候选（ASCII，大小写不敏感匹配）
    replacements: Vec<(&'static str, &'static [&'static str])>,
    /// 高分桶感叹词
    high_interjections: &'static [&'static str],
    /// 低分桶感叹词
    low_interjections: &'static [&'static str],
    /// 碎碎念填充词
    fillers: &'static [&'static str],
}

impl DrunkPersona {
    pub fn new() -> Self {
        Self {
            replacements: vec![
                ("what", &["whaaaat", "wha", "what the hell"]),
                ("that", &["thaaaat", "that's", "tha"]),
                ("oh", &["ohhhhh", "oooooh", "oh my"]),
                ("wow", &["wooooow", "woah", "holy shit"]),
                ("nice", &["niiiiice", "nice!", "well well well"]),
                ("miss", &["*hiccup* miss", "missed!", "airballed that one"]),
            ],
            high_interjections: &["*laughs*", "wooooow", "holy shit"],
            low_interjections: &["*burps*", "*chuckles*", "oooooh"],
            fillers: &[
                "uhhhh",
                "ya know",
                "like",
                "I mean",
                "wait what was I saying",
                "anyway",
            ],
        }
    }

    /// 醉化解说文本
    ///
    /// 使用进程级随机源，每次调用结果不同
    pub fn enhance(&self, text: &str, quality: Option<ThrowQuality>) -> String {
        self.enhance_with_rng(text, quality, &mut rand::rng())
    }

    /// 醉化解说文本（显式随机源，测试时可注入种子）
    pub fn enhance_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        quality: Option<ThrowQuality>,
        rng: &mut R,
    ) -> String {
        // 句读改成拖长的停顿
        let mut enhanced = text.replace(", ", "... ").replace(". ", "... ");

        // 关键词独立掷骰换成醉话，每个关键词至多替换首个匹配
        for &(word, candidates) in &self.replacements {
            if find_ignore_ascii_case(&enhanced, word).is_some() && rng.random_bool(REPLACE_PROB) {
                if let Some(&pick) = candidates.choose(rng) {
                    enhanced = replace_first_ignore_ascii_case(&enhanced, word, pick);
                }
            }
        }

        // 按质量桶随机前置感叹词，未知/缺失标签直接跳过
        match quality.and_then(ThrowQuality::bucket) {
            Some(QualityBucket::High) if rng.random_bool(HIGH_INTERJECT_PROB) => {
                if let Some(&pick) = self.high_interjections.choose(rng) {
                    enhanced = format!("{} {}", pick, enhanced);
                }
            }
            Some(QualityBucket::Low) if rng.random_bool(LOW_INTERJECT_PROB) => {
                if let Some(&pick) = self.low_interjections.choose(rng) {
                    enhanced = format!("{} {}", pick, enhanced);
                }
            }
            _ => {}
        }

        // 在词序中点塞一句碎碎念，太短的句子不塞
        if rng.random_bool(FILLER_PROB) {
            if let Some(&pick) = self.fillers.choose(rng) {
                let words: Vec<&str> = enhanced.split_whitespace().collect();
                if words.len() > FILLER_MIN_WORDS {
                    let mid = words.len() / 2;
                    let mut rambling: Vec<&str> = Vec::with_capacity(words.len() + 1);
                    rambling.extend_from_slice(&words[..mid]);
                    rambling.push(pick);
                    rambling.extend_from_slice(&words[mid..]);
                    enhanced = rambling.join(" ");
                }
            }
        }

        // 偶尔拖个尾音
        if rng.random_bool(TRAIL_OFF_PROB) {
            enhanced.push_str("...");
        }

        enhanced
    }
}

impl Default for DrunkPersona {
    fn default() -> Self {
        Self::new()
    }
}

/// 找到第一个 ASCII 大小写不敏感匹配的字节起点
///
/// needle 必须是纯 ASCII；匹配成功即保证切分点落在字符边界上
/// （多字节 UTF-8 字节不会与 ASCII 字节判等）
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let n = needle.len();
    if n == 0 || haystack.len() < n {
        return None;
    }
    haystack
        .as_bytes()
        .windows(n)
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// 替换第一个 ASCII 大小写不敏感匹配，找不到则原样返回
fn replace_first_ignore_ascii_case(text: &str, needle: &str, replacement: &str) -> String {
    match find_ignore_ascii_case(text, needle) {
        Some(start) => {
            let mut out = String::with_capacity(text.len() + replacement.len());
            out.push_str(&text[..start]);
            out.push_str(replacement);
            out.push_str(&text[start + needle.len()..]);
            out
        }
        None => text.to_string(),
    }
}
