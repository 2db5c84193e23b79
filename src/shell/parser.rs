use crate::error::{Result, ShellError};
use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

/// 실행할 프로그램과 인자 (클라이언트가 보낸 바이트 그대로)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl ParsedCommand {
    /// 한 줄을 명령어로 변환
    ///
    /// 토큰이 없으면 `Ok(None)`, 따옴표나 백슬래시가 짝이 맞지 않으면
    /// `UnbalancedQuotes` 에러를 반환합니다.
    pub fn parse(line: impl AsRef<[u8]>) -> Result<Option<Self>> {
        let mut tokens = split(line.as_ref())?.into_iter().map(OsString::from_vec);
        Ok(tokens.next().map(|program| Self {
            program,
            args: tokens.collect(),
        }))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Quote {
    None,
    Single,
    Double,
}

/// 셸 방식의 단어 분리 (확장, 글로브, 리다이렉션은 해석하지 않음)
///
/// 특수 문자는 모두 ASCII이므로 UTF-8이 아닌 바이트도 그대로 통과합니다.
pub fn split(line: &[u8]) -> Result<Vec<Vec<u8>>> {
    let unbalanced = || ShellError::UnbalancedQuotes(String::from_utf8_lossy(line).into_owned());

    let mut tokens = Vec::new();
    let mut current = Vec::new();
    // '' 처럼 빈 따옴표도 토큰 하나로 취급
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut bytes = line.iter().copied();

    while let Some(b) = bytes.next() {
        match quote {
            Quote::Single => {
                if b == b'\'' {
                    quote = Quote::None;
                } else {
                    current.push(b);
                }
            }
            Quote::Double => match b {
                b'"' => quote = Quote::None,
                b'\\' => {
                    let next = bytes.next().ok_or_else(unbalanced)?;
                    if !matches!(next, b'$' | b'`' | b'"' | b'\\' | b'\n') {
                        current.push(b'\\');
                    }
                    current.push(next);
                }
                _ => current.push(b),
            },
            Quote::None => match b {
                b'\'' => {
                    quote = Quote::Single;
                    in_word = true;
                }
                b'"' => {
                    quote = Quote::Double;
                    in_word = true;
                }
                b'\\' => {
                    current.push(bytes.next().ok_or_else(unbalanced)?);
                    in_word = true;
                }
                c if c.is_ascii_whitespace() => {
                    if in_word {
                        tokens.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote != Quote::None {
        return Err(unbalanced());
    }
    if in_word {
        tokens.push(current);
    }

    Ok(tokens)
}
