/// 追加在明文之后的结束标记。
/// 解码时以它作为消息的终点，载荷中不存在长度前缀。
pub const TERMINATOR: &[u8] = b"||EOF||";

/// 每个消息字节展开为 8 个 bit，每个 bit 占用一个像素字节的最低位。
pub const BITS_PER_BYTE: usize = 8;

/// `can_hide_more` 要求剩余的最少可用 bit 数 (即 2 个字节)。
pub const MIN_SPARE_BITS: usize = 16;

/// 未指定输出路径时，隐写结果图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
