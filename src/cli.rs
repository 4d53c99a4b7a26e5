use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{session::ChatSession, types::TurnReply};

const RULE: &str = "============================================================";

/// Interactive read-moderate-reply loop. Ends on `quit`, `exit`, `q`, or end of input.
pub async fn run_chat_loop<R, W>(
    session: &ChatSession,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_banner(&mut output, session.model_name()).await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"\nYou: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            write_text(&mut output, "\n\nGoodbye! Thanks for chatting!\n").await?;
            break;
        };
        let line = line.trim();

        match line.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                write_text(&mut output, "\nGoodbye! Thanks for chatting!\n").await?;
                break;
            }
            "help" => {
                write_help(&mut output).await?;
                continue;
            }
            "keywords" => {
                write_keywords(&mut output, &session.filter().keywords()).await?;
                continue;
            }
            "" => {
                write_text(&mut output, "Please enter a message.\n").await?;
                continue;
            }
            _ => {}
        }

        let reply = TurnReply::from(session.handle_turn(line).await);
        let text = if reply.approved {
            format!("\nAI: {}\n", reply.message)
        } else {
            format!("\n{}\n", reply.message)
        };
        write_text(&mut output, &text).await?;
    }

    output.flush().await?;
    Ok(())
}

async fn write_text<W>(output: &mut W, text: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    Ok(())
}

async fn write_banner<W>(output: &mut W, model: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let banner = format!(
        "{RULE}\nSafechat ({model})\n{RULE}\n\
         Type 'quit' or 'exit' to end the conversation\n\
         Type 'help' for available commands\n{RULE}\n"
    );
    write_text(output, &banner).await
}

async fn write_help<W>(output: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let help = format!(
        "\n{RULE}\nAvailable commands:\n{RULE}\n\
         \x20 quit/exit/q  - Exit the application\n\
         \x20 help         - Show this help message\n\
         \x20 keywords     - Show list of blocked keywords\n{RULE}\n"
    );
    write_text(output, &help).await
}

async fn write_keywords<W>(output: &mut W, keywords: &[String]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut text = format!("\n{RULE}\nBlocked keywords:\n{RULE}\n");
    for keyword in keywords {
        text.push_str(&format!("  - {keyword}\n"));
    }
    text.push_str(&format!("{RULE}\nTotal: {} keywords\n", keywords.len()));
    write_text(output, &text).await
}
