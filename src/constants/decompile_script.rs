/// Post-analysis script handed to the headless decompiler. The first script argument is the
/// directory the three output files are written to.
pub const DECOMPILE_SCRIPT: &str = r#"// Extracts a listing, decompiled C and program metadata for every function.
//@category Spectrace
import ghidra.app.decompiler.DecompInterface;
import ghidra.app.decompiler.DecompileResults;
import ghidra.app.script.GhidraScript;
import ghidra.program.model.address.Address;
import ghidra.program.model.address.AddressSetView;
import ghidra.program.model.listing.*;
import java.io.File;
import java.io.FileWriter;

public class DecompileAll extends GhidraScript {

    @Override
    public void run() throws Exception {
        String[] args = getScriptArgs();
        File outDir = new File(args.length > 0 ? args[0] : ".");

        try (FileWriter asm = new FileWriter(new File(outDir, "assembly_output.txt"));
             FileWriter dec = new FileWriter(new File(outDir, "decompiled_output.txt"));
             FileWriter meta = new FileWriter(new File(outDir, "metadata_output.txt"))) {

            Program program = currentProgram;
            meta.write("Program: " + program.getName() + "\n");
            meta.write("Language: " + program.getLanguage().getLanguageID() + "\n");
            meta.write("Compiler: " + program.getCompilerSpec().getCompilerSpecID() + "\n");
            meta.write("Architecture: " + program.getLanguage().getProcessor() + "\n");
            meta.write("Address Size: " + program.getAddressFactory().getDefaultAddressSpace().getSize() + "\n");
            meta.write("Executable Format: " + program.getExecutableFormat() + "\n");

            Listing listing = program.getListing();
            DecompInterface decompiler = new DecompInterface();
            decompiler.openProgram(program);

            for (Function function : program.getFunctionManager().getFunctions(true)) {
                if (monitor.isCancelled()) {
                    break;
                }
                String header = "\n=== Function: " + function.getName() + " @ " + function.getEntryPoint() + " ===\n";
                asm.write(header);
                dec.write(header);

                AddressSetView body = function.getBody();
                for (Address addr : body.getAddresses(true)) {
                    CodeUnit unit = listing.getCodeUnitAt(addr);
                    if (unit != null) {
                        asm.write(addr + ": " + unit + "\n");
                    }
                }

                try {
                    DecompileResults results = decompiler.decompileFunction(function, 30, monitor);
                    if (results.decompileCompleted()) {
                        dec.write(results.getDecompiledFunction().getC() + "\n");
                    } else {
                        dec.write("// decompilation failed: " + results.getErrorMessage() + "\n");
                    }
                } catch (Exception e) {
                    dec.write("// decompilation error: " + e.getMessage() + "\n");
                }
            }

            decompiler.dispose();
        }
    }
}
"#;
