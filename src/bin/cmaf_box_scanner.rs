use cmafparser::mp4::codec_display_name;
use cmafparser::{
    analyze_segments, segment_source_for, BoxSummary, SegmentAnalyzer, SegmentReport,
    SegmentSource,
};
use std::env;

#[tokio::main]
async fn main() {
    println!("🔍 CMAF Box Scanner - Segment Structure Analysis");
    println!("================================================");

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        println!("Usage: cmaf_box_scanner <segment.m4s|url> [more segments...]");
        println!("Example: cmaf_box_scanner init.mp4 seg1.m4s seg2.m4s");
        return;
    }

    if args.len() == 1 {
        scan_single(&args[0]).await;
    } else {
        scan_batch(args).await;
    }
}

async fn scan_single(path: &str) {
    let source = match segment_source_for(path, None) {
        Ok(source) => source,
        Err(e) => {
            println!("\n❌ Scan failed: {}", e);
            return;
        }
    };
    let data = match source.fetch().await {
        Ok(data) => data,
        Err(e) => {
            println!("\n❌ Scan failed: {}", e);
            return;
        }
    };

    println!("📄 Segment: {}", source.describe());
    println!("📏 Size: {} bytes", data.len());
    println!();

    let report = SegmentAnalyzer::default().analyze(&data);
    if let Some(boxes) = &report.box_summary {
        for summary in boxes {
            print_box(summary, 0);
        }
    }
    println!();
    print_tracks(&report);
    print_issues(&report);
    println!("\n✅ Scan completed");
}

async fn scan_batch(paths: Vec<String>) {
    let batch = analyze_segments(paths.clone()).await;

    for segment in &batch.segments {
        let report = &segment.report;
        let name = paths.get(segment.index).map(String::as_str).unwrap_or("?");
        println!(
            "#{:<3} {} [{} bytes, {} fragment(s), {} issue(s)]",
            segment.index,
            name,
            report.size_bytes,
            report.fragments.len(),
            report.issues.len()
        );
    }

    let summary = &batch.summary;
    println!();
    println!("📊 Segments: {}", summary.segment_count);
    println!("📥 Total size: {} bytes", summary.total_size_bytes);
    if let Some(average) = summary.average_size_bytes {
        println!("📐 Average size: {:.0} bytes", average);
    }
    if let Some(video) = &summary.video_track {
        println!(
            "🎬 Video: track {} {} ({})",
            video.track_id,
            video.codec,
            codec_display_name(&video.codec)
        );
    }
    if let Some(audio) = &summary.audio_track {
        println!(
            "🔊 Audio: track {} {} ({})",
            audio.track_id,
            audio.codec,
            codec_display_name(&audio.codec)
        );
    }
    println!("🔐 Encrypted: {}", summary.any_encrypted);
    println!("⚠️  Issues: {}", summary.issue_count);
}

fn print_box(summary: &BoxSummary, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}📦 {} [size: {}, pos: {}-{}]",
        indent,
        summary.box_type,
        summary.size,
        summary.offset,
        summary.offset + summary.size
    );
    for child in &summary.children {
        print_box(child, depth + 1);
    }
}

fn print_tracks(report: &SegmentReport) {
    if let Some(seconds) = report.segment_duration_seconds {
        println!("⏱️  Duration: {:.3}s", seconds);
    }
    if let Some(video) = &report.video_track {
        println!(
            "🎬 Video track {}: {} ({})",
            video.track_id,
            video.codec,
            codec_display_name(&video.codec)
        );
        if let Some(resolution) = video.resolution {
            println!("   📐 {}x{}", resolution.width, resolution.height);
        }
        if let Some(signal) = &video.hdr_signal_box {
            println!("   🏷️  Config box: {}", signal);
        }
        if video.encrypted {
            println!(
                "   🔐 Encrypted (scheme: {})",
                video.protection_scheme.as_deref().unwrap_or("unknown")
            );
        }
    }
    if let Some(audio) = &report.audio_track {
        println!(
            "🔊 Audio track {}: {} ({})",
            audio.track_id,
            audio.codec,
            codec_display_name(&audio.codec)
        );
        if let (Some(channels), Some(rate)) = (audio.channels, audio.sample_rate_hz) {
            println!("   🎚️  {} channel(s) @ {} Hz", channels, rate);
        }
        if audio.encrypted {
            println!(
                "   🔐 Encrypted (scheme: {})",
                audio.protection_scheme.as_deref().unwrap_or("unknown")
            );
        }
    }
    for fragment in &report.fragments {
        println!(
            "🧩 traf track={} decode_time={} samples={}",
            fragment
                .track_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "?".to_string()),
            fragment
                .decode_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string()),
            fragment.sample_count
        );
    }
}

fn print_issues(report: &SegmentReport) {
    if report.issues.is_empty() {
        return;
    }
    println!();
    println!("📝 Issues:");
    for issue in &report.issues {
        println!("   • {}", issue);
    }
}
