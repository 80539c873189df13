use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use solitaire_core::{ClientMessage, ServerMessage, UserId};

const DEFAULT_URL: &str = "ws://127.0.0.1:25917/ws";

/// 一行输入的解析结果
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Send(ClientMessage),
    Exit,
}

/// 解析用户输入，开头的 `/` 可以省略。出错时返回给用户看的提示。
fn parse_command(line: &str) -> Result<Input, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = parts.first().map(|c| c.trim_start_matches('/'));

    let msg = match command {
        Some("start") => ClientMessage::StartGame,
        Some("draw") => ClientMessage::Draw,
        Some("cheat") => ClientMessage::Cheat,
        Some("help") => ClientMessage::Help,
        Some("exit") => return Ok(Input::Exit),
        Some("move") => {
            let usage = "用法: move <from_row> <card_index> <to_row>".to_string();
            if parts.len() != 4 {
                return Err(usage);
            }
            let mut nums = [0usize; 3];
            for (slot, raw) in nums.iter_mut().zip(&parts[1..]) {
                *slot = raw.parse().map_err(|_| usage.clone())?;
            }
            let [from_row, card_index, to_row] = nums;
            ClientMessage::Move { from_row, card_index, to_row }
        }
        Some(other) => return Err(format!("未知命令: {}，输入 help 查看可用命令", other)),
        None => return Err(String::new()),
    };
    Ok(Input::Send(msg))
}

/// 把服务器消息转成要打印的文字
fn format_server_message(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::Welcome { your_id } => format!("已连接，你的用户 ID: {}", your_id),
        ServerMessage::Board { text } => text.clone(),
        ServerMessage::Victory { text } => text.clone(),
        ServerMessage::Help { text } => text.clone(),
        ServerMessage::Info { message } => message.clone(),
        ServerMessage::Error { message } => format!("错误: {}", message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 参数: [服务器地址] [用于接回会话的用户 ID]
    let mut args = std::env::args().skip(1);
    let url = Url::parse(&args.next().unwrap_or_else(|| DEFAULT_URL.to_string()))?;
    let resume: Option<UserId> = args.next().map(|raw| raw.parse()).transpose()?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 启动一个任务来处理从服务器接收的消息
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(server_msg) => {
                        println!("\n{}\n", format_server_message(&server_msg));
                        print!("> "); // 重新显示输入提示符
                        let _ = std::io::stdout().flush();
                    }
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    let hello = serde_json::to_string(&ClientMessage::Hello { user_id: resume })?;
    write.send(Message::Text(hello.into())).await?;

    // 主任务处理用户输入
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("--- 接龙客户端 ---");
    println!("可用命令:");
    println!("  start                                  - 开一局新游戏");
    println!("  draw                                   - 从牌堆翻一张牌");
    println!("  move <from_row> <card_index> <to_row>  - 移动牌链");
    println!("  cheat                                  - 直接填满接龙行");
    println!("  help                                   - 查看服务器端指令说明");
    println!("  exit                                   - 退出");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Ok(Input::Send(msg)) => {
                let payload = serde_json::to_string(&msg)?;
                write.send(Message::Text(payload.into())).await?;
            }
            Ok(Input::Exit) => {
                println!("正在断开连接...");
                break;
            }
            Err(hint) if hint.is_empty() => {}
            Err(hint) => println!("{}", hint),
        }
    }

    Ok(())
}
